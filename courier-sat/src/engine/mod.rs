pub(crate) mod sat;
mod sat_solver;
pub mod termination;

pub use sat_solver::*;
