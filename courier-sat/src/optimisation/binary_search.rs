use log::debug;

use super::optimisation_solver::CheckOutcome;
use super::OptimisationResult;
use super::OptimisationSolver;
use crate::asserts::sat_assert_moderate;
use crate::context::ContextError;
use crate::context::SolverContext;
use crate::routing::RoutingSolution;

/// Bisects `[lower bound, best objective]`; every probe asserts its bound under a checkpoint
/// which is popped before the next probe.
#[derive(Debug, Copy, Clone)]
pub(crate) struct BinarySearch;

impl BinarySearch {
    pub(crate) fn solve<Context: SolverContext>(
        &self,
        solver: &mut OptimisationSolver<'_, Context>,
        initial_solution: RoutingSolution,
    ) -> Result<OptimisationResult, ContextError> {
        let mut lower_bound = solver.min_path();
        let mut upper_bound = initial_solution.objective();
        let mut best_solution = initial_solution;

        while lower_bound < upper_bound {
            let probe = lower_bound + (upper_bound - lower_bound) / 2;

            solver.push();
            let bound = solver.max_distance().leq_int(probe);
            solver.assert_formula(bound);
            let outcome = solver.check();
            solver.pop()?;

            match outcome {
                CheckOutcome::Solution(solution) => {
                    sat_assert_moderate!(
                        solution.objective() <= probe,
                        "A probe must respect its bound."
                    );
                    solver.log_improvement(&solution);
                    upper_bound = solution.objective();
                    best_solution = solution;
                }
                CheckOutcome::Unsatisfiable => lower_bound = probe + 1,
                CheckOutcome::Unknown => {
                    return Ok(OptimisationResult::Satisfiable { best_solution });
                }
            }
            debug!("Probe at {probe}, the objective is within [{lower_bound}, {upper_bound}]");
        }

        Ok(OptimisationResult::Optimal {
            solution: best_solution,
        })
    }
}
