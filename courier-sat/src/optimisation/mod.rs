//! Minimisation of the longest courier distance by repeatedly checking a [`SolverContext`] and
//! tightening the bound on the objective.
//!
//! [`SolverContext`]: crate::context::SolverContext

use std::fmt::Display;

use clap::ValueEnum;

mod binary_search;
mod linear_search;
mod optimisation_result;
mod optimisation_solver;

pub(crate) use binary_search::*;
pub(crate) use linear_search::*;
pub use optimisation_result::*;
pub use optimisation_solver::*;

/// How the bound on the objective is tightened after the first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OptimisationStrategy {
    /// Requires every next solution to be strictly better than the best one so far, until the
    /// context becomes unsatisfiable.
    #[default]
    Linear,
    /// Halves the interval between the lower bound and the best objective so far with every
    /// probe; a probe is scoped by a checkpoint, so refuted bounds are retracted.
    BinarySearch,
}

impl Display for OptimisationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimisationStrategy::Linear => write!(f, "linear"),
            OptimisationStrategy::BinarySearch => write!(f, "binary-search"),
        }
    }
}
