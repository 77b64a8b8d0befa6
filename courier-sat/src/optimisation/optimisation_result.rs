use std::time::Duration;

use crate::routing::RoutingSolution;

/// The result of [`OptimisationSolver::solve()`].
///
/// [`OptimisationSolver::solve()`]: super::OptimisationSolver::solve
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptimisationResult {
    /// There exists no solution with a better objective value than this one.
    Optimal { solution: RoutingSolution },
    /// The optimal solution was not proven within the time budget. However, at least one
    /// solution was found. The provided solution is the solution with the best objective value
    /// that was encountered.
    Satisfiable { best_solution: RoutingSolution },
    /// No solutions exist.
    Infeasible,
    /// No solution was found within the time budget.
    Unknown,
}

impl OptimisationResult {
    pub fn is_optimal(&self) -> bool {
        matches!(self, OptimisationResult::Optimal { .. })
    }

    pub fn solution(&self) -> Option<&RoutingSolution> {
        match self {
            OptimisationResult::Optimal { solution } => Some(solution),
            OptimisationResult::Satisfiable { best_solution } => Some(best_solution),
            OptimisationResult::Infeasible | OptimisationResult::Unknown => None,
        }
    }

    pub fn objective(&self) -> Option<u64> {
        self.solution().map(RoutingSolution::objective)
    }
}

/// An [`OptimisationResult`] together with the effort it took.
#[derive(Clone, Debug)]
pub struct OptimisationReport {
    pub result: OptimisationResult,
    /// The time since the process stopwatch was started.
    pub time: Duration,
    /// The number of checks of the solver context, including the first one.
    pub num_checks: usize,
}
