use std::time::Duration;

use log::debug;
use log::info;

use super::BinarySearch;
use super::LinearSearch;
use super::OptimisationReport;
use super::OptimisationResult;
use super::OptimisationStrategy;
use crate::basic_types::Stopwatch;
use crate::context::CheckResult;
use crate::context::ContextError;
use crate::context::SolverContext;
use crate::context::SolverOption;
use crate::encoders::BitVector;
use crate::formula::Formula;
use crate::routing::RoutingInstance;
use crate::routing::RoutingModel;
use crate::routing::RoutingSolution;

pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(300);

/// Attempts to find a routing solution with minimal maximum distance, within a time limit.
///
/// The model is built once; bounds on the objective are asserted into the same context.
#[derive(Debug)]
pub struct OptimisationSolver<'a, Context> {
    context: &'a mut Context,
    model: &'a RoutingModel,
    instance: &'a RoutingInstance,
    time_limit: Duration,
    process_time: Stopwatch,
    num_checks: usize,
}

impl<'a, Context: SolverContext> OptimisationSolver<'a, Context> {
    /// The time limit counts from the moment `process_time` was started.
    pub fn new(
        context: &'a mut Context,
        model: &'a RoutingModel,
        instance: &'a RoutingInstance,
        time_limit: Duration,
        process_time: Stopwatch,
    ) -> Self {
        OptimisationSolver {
            context,
            model,
            instance,
            time_limit,
            process_time,
            num_checks: 0,
        }
    }

    pub fn solve(
        mut self,
        strategy: OptimisationStrategy,
    ) -> Result<OptimisationReport, ContextError> {
        let result = match self.check() {
            CheckOutcome::Solution(solution) => {
                debug!(
                    "Initial solution took {} seconds",
                    self.process_time.elapsed().as_secs()
                );
                self.log_improvement(&solution);

                match strategy {
                    OptimisationStrategy::Linear => LinearSearch.solve(&mut self, solution)?,
                    OptimisationStrategy::BinarySearch => {
                        BinarySearch.solve(&mut self, solution)?
                    }
                }
            }
            CheckOutcome::Unsatisfiable => OptimisationResult::Infeasible,
            CheckOutcome::Unknown => OptimisationResult::Unknown,
        };

        Ok(OptimisationReport {
            result,
            time: self.process_time.elapsed(),
            num_checks: self.num_checks,
        })
    }

    /// Checks the context with the remaining time budget.
    pub(crate) fn check(&mut self) -> CheckOutcome {
        let remaining = self.process_time.remaining(self.time_limit);
        self.context.set_option(SolverOption::Timeout(remaining));
        self.num_checks += 1;

        match self.context.check() {
            CheckResult::Sat => match self.context.model() {
                Some(solution) => {
                    CheckOutcome::Solution(RoutingSolution::from_model(self.model, solution))
                }
                None => CheckOutcome::Unknown,
            },
            CheckResult::Unsat => CheckOutcome::Unsatisfiable,
            CheckResult::Unknown => CheckOutcome::Unknown,
        }
    }

    pub(crate) fn max_distance(&self) -> &BitVector {
        self.model.max_distance()
    }

    pub(crate) fn min_path(&self) -> u64 {
        self.instance.min_path()
    }

    pub(crate) fn assert_formula(&mut self, formula: Formula) {
        self.context.assert_formula(formula);
    }

    pub(crate) fn push(&mut self) {
        self.context.push();
    }

    pub(crate) fn pop(&mut self) -> Result<(), ContextError> {
        self.context.pop()
    }

    pub(crate) fn log_improvement(&self, solution: &RoutingSolution) {
        info!(
            "Current objective is {} after {} seconds ({} ms)",
            solution.objective(),
            self.process_time.elapsed().as_secs(),
            self.process_time.elapsed().as_millis(),
        );
    }
}

#[derive(Debug)]
pub(crate) enum CheckOutcome {
    Solution(RoutingSolution),
    Unsatisfiable,
    Unknown,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::OptimisationSolver;
    use super::DEFAULT_TIME_LIMIT;
    use crate::basic_types::Stopwatch;
    use crate::context::CdclContext;
    use crate::engine::termination::TerminationCondition;
    use crate::optimisation::OptimisationReport;
    use crate::optimisation::OptimisationResult;
    use crate::optimisation::OptimisationStrategy;
    use crate::routing::RoutingInstance;
    use crate::routing::RoutingModelBuilder;

    fn optimise(
        instance: &RoutingInstance,
        strategy: OptimisationStrategy,
        time_limit: Duration,
    ) -> OptimisationReport {
        optimise_in(CdclContext::default(), instance, strategy, time_limit)
    }

    fn optimise_in(
        mut context: CdclContext,
        instance: &RoutingInstance,
        strategy: OptimisationStrategy,
        time_limit: Duration,
    ) -> OptimisationReport {
        let process_time = Stopwatch::starting_now();
        let model = RoutingModelBuilder::new(instance, &mut context).build();

        OptimisationSolver::new(&mut context, &model, instance, time_limit, process_time)
            .solve(strategy)
            .expect("every probe pops its own checkpoint")
    }

    /// Items on both sides of the origin, where the second courier can carry only one item. The
    /// first courier has to cross the origin, so the optimum (6) is above the lower bound (4).
    fn two_sided_instance() -> RoutingInstance {
        let positions: [i64; 5] = [-2, -1, 1, 2, 0];
        let distances = positions
            .iter()
            .map(|from| positions.iter().map(|to| from.abs_diff(*to)).collect())
            .collect();
        RoutingInstance::new(vec![3, 1], vec![1, 1, 1, 1], distances).expect("valid instance")
    }

    #[test]
    fn both_strategies_find_the_same_optimum() {
        let instance = two_sided_instance();

        let linear = optimise(&instance, OptimisationStrategy::Linear, DEFAULT_TIME_LIMIT);
        let bisected = optimise(&instance, OptimisationStrategy::BinarySearch, DEFAULT_TIME_LIMIT);

        assert_eq!(instance.min_path(), 4);
        assert!(linear.result.is_optimal());
        assert!(bisected.result.is_optimal());
        assert_eq!(linear.result.objective(), Some(6));
        assert_eq!(bisected.result.objective(), Some(6));
    }

    #[test]
    fn binary_search_uses_logarithmically_many_checks() {
        let instance = two_sided_instance();
        let range = instance.max_path() - instance.min_path();

        let report = optimise(&instance, OptimisationStrategy::BinarySearch, DEFAULT_TIME_LIMIT);

        let max_probes = (u64::BITS - range.leading_zeros()) as usize + 1;
        assert!(report.num_checks <= 1 + max_probes, "{report:?}");
        let objective = report.result.objective().expect("instance is feasible");
        assert!((instance.min_path()..=instance.max_path()).contains(&objective));
    }

    #[test]
    fn infeasible_instances_have_no_solution() {
        let instance = RoutingInstance::new(vec![1], vec![2], vec![vec![0, 1], vec![1, 0]])
            .expect("valid instance");

        let report = optimise(&instance, OptimisationStrategy::Linear, DEFAULT_TIME_LIMIT);

        assert_eq!(report.result, OptimisationResult::Infeasible);
        assert_eq!(report.result.objective(), None);
        assert_eq!(report.num_checks, 1);
    }

    #[test]
    fn exhausted_time_limit_is_unknown() {
        let instance = two_sided_instance();

        let report = optimise(&instance, OptimisationStrategy::BinarySearch, Duration::ZERO);

        assert_eq!(report.result, OptimisationResult::Unknown);
        assert!(!report.result.is_optimal());
    }

    /// Stops the engine once it has been polled `limit` times, across all checks.
    #[derive(Debug)]
    struct StopAfterPolls {
        limit: usize,
        num_polls: usize,
    }

    impl TerminationCondition for StopAfterPolls {
        fn should_stop(&mut self) -> bool {
            self.num_polls += 1;
            self.num_polls > self.limit
        }
    }

    #[test]
    fn interrupt_after_a_solution_keeps_the_best_one() {
        let instance = two_sided_instance();

        for strategy in [OptimisationStrategy::Linear, OptimisationStrategy::BinarySearch] {
            let context = CdclContext::default().with_interrupt(StopAfterPolls {
                limit: 200,
                num_polls: 0,
            });

            let report = optimise_in(context, &instance, strategy, DEFAULT_TIME_LIMIT);

            assert!(
                matches!(report.result, OptimisationResult::Satisfiable { .. }),
                "{strategy}: {report:?}"
            );
            assert!(!report.result.is_optimal());
            assert_eq!(report.result.objective(), Some(6));
            assert!(report.num_checks > 1);
        }
    }
}
