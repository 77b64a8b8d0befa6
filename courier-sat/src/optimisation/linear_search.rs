use super::optimisation_solver::CheckOutcome;
use super::OptimisationResult;
use super::OptimisationSolver;
use crate::asserts::sat_assert_moderate;
use crate::context::ContextError;
use crate::context::SolverContext;
use crate::routing::RoutingSolution;

/// Requires each next solution to be strictly better, permanently.
#[derive(Debug, Copy, Clone)]
pub(crate) struct LinearSearch;

impl LinearSearch {
    pub(crate) fn solve<Context: SolverContext>(
        &self,
        solver: &mut OptimisationSolver<'_, Context>,
        initial_solution: RoutingSolution,
    ) -> Result<OptimisationResult, ContextError> {
        let mut best_solution = initial_solution;

        loop {
            if best_solution.objective() <= solver.min_path() {
                return Ok(OptimisationResult::Optimal {
                    solution: best_solution,
                });
            }

            let bound = solver.max_distance().less_int(best_solution.objective());
            solver.assert_formula(bound);

            match solver.check() {
                CheckOutcome::Solution(solution) => {
                    sat_assert_moderate!(
                        solution.objective() < best_solution.objective(),
                        "Each iteration of linear search must yield a strictly better solution."
                    );
                    solver.log_improvement(&solution);
                    best_solution = solution;
                }
                CheckOutcome::Unsatisfiable => {
                    return Ok(OptimisationResult::Optimal {
                        solution: best_solution,
                    })
                }
                CheckOutcome::Unknown => {
                    return Ok(OptimisationResult::Satisfiable { best_solution })
                }
            }
        }
    }
}
