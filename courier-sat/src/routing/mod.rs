//! The courier routing problem: instances, their encoding into a [`SolverContext`], and the
//! decoding of models into routes.
//!
//! [`SolverContext`]: crate::context::SolverContext

mod instance;
mod model_builder;
mod solution;

pub use instance::*;
pub use model_builder::*;
pub use solution::*;
