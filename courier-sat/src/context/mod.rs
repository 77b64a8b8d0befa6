//! The interface through which models are asserted and checked, independent of the engine which
//! decides them.

mod cdcl_context;

use std::time::Duration;

pub use cdcl_context::*;
use thiserror::Error;

use crate::basic_types::Solution;
use crate::formula::Formula;
use crate::formula::VariablePool;

/// The outcome of [`SolverContext::check`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckResult {
    Sat,
    Unsat,
    /// The check was stopped before a conclusion, for instance because the timeout elapsed.
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverOption {
    /// Limits every following [`SolverContext::check`] to the given wall-clock time.
    Timeout(Duration),
    /// A hint for the number of threads the backend may use.
    Threads(usize),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Cannot pop a checkpoint since none has been pushed")]
    NoCheckpoint,
}

/// A satisfiability backend with a stack of checkpoints.
///
/// Formulas asserted after a [`SolverContext::push`] are retracted by the matching
/// [`SolverContext::pop`]; the propositions they introduced remain valid.
pub trait SolverContext {
    /// The pool from which every proposition used in asserted formulas has to come.
    fn variables(&mut self) -> &mut VariablePool;

    fn assert_formula(&mut self, formula: Formula);

    fn push(&mut self);

    fn pop(&mut self) -> Result<(), ContextError>;

    fn set_option(&mut self, option: SolverOption);

    fn check(&mut self) -> CheckResult;

    /// The satisfying assignment of the last [`SolverContext::check`], if it returned
    /// [`CheckResult::Sat`] and nothing was asserted since.
    fn model(&self) -> Option<&Solution>;
}
