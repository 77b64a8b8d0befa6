use std::fmt::Debug;
use std::time::Duration;

use log::debug;
use log::warn;

use super::CheckResult;
use super::ContextError;
use super::SolverContext;
use super::SolverOption;
use crate::asserts::sat_assert_eq_simple;
use crate::basic_types::Literal;
use crate::basic_types::Solution;
use crate::basic_types::SolverExecutionFlag;
use crate::basic_types::Stopwatch;
use crate::engine::termination::Combinator;
use crate::engine::termination::TerminationCondition;
use crate::engine::termination::TimeBudget;
use crate::engine::SatSolver;
use crate::engine::SatSolverOptions;
use crate::formula::Formula;
use crate::formula::TseitinEncoder;
use crate::formula::VariablePool;

/// A [`SolverContext`] backed by the in-crate [`SatSolver`].
///
/// Every checkpoint is an activation literal: clauses asserted under a checkpoint are extended
/// with the negated activation literal, and the activation literals of the open checkpoints are
/// passed to the engine as assumptions. Popping a checkpoint fixes its activation literal to
/// false, which permanently disables the clauses asserted under it.
pub struct CdclContext {
    solver: SatSolver,
    variables: VariablePool,
    encoder: TseitinEncoder,
    checkpoints: Vec<Literal>,
    timeout: Option<Duration>,
    num_threads: usize,
    interrupt: Option<Box<dyn TerminationCondition>>,
    model: Option<Solution>,
}

impl Default for CdclContext {
    fn default() -> Self {
        CdclContext::new(SatSolverOptions::default())
    }
}

impl Debug for CdclContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdclContext")
            .field("solver", &self.solver)
            .field("variables", &self.variables)
            .field("checkpoints", &self.checkpoints)
            .field("timeout", &self.timeout)
            .field("num_threads", &self.num_threads)
            .field("has_interrupt", &self.interrupt.is_some())
            .field("has_model", &self.model.is_some())
            .finish()
    }
}

impl CdclContext {
    pub fn new(options: SatSolverOptions) -> CdclContext {
        let solver = SatSolver::new(options);
        let variables = VariablePool::default();
        sat_assert_eq_simple!(solver.get_true_literal(), variables.true_literal());

        CdclContext {
            solver,
            variables,
            encoder: TseitinEncoder::default(),
            checkpoints: vec![],
            timeout: None,
            num_threads: 1,
            interrupt: None,
            model: None,
        }
    }

    /// The thread hint of the last [`SolverOption::Threads`]; the engine itself is sequential.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Installs a condition which stops every following check when it triggers, in addition to
    /// the timeout.
    pub fn with_interrupt(mut self, interrupt: impl TerminationCondition + 'static) -> CdclContext {
        self.interrupt = Some(Box::new(interrupt));
        self
    }

    pub fn num_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    /// Creates the engine propositions for every proposition handed out by the pool.
    fn synchronise_variables(&mut self) {
        while self.solver.num_propositional_variables() < self.variables.num_variables() {
            let _ = self.solver.create_new_propositional_variable();
        }
    }

    fn add_clause(&mut self, clause: Vec<Literal>) {
        // a root conflict leaves the engine infeasible, which the next check reports
        if self.solver.add_clause(clause).is_err() {
            debug!("The asserted clauses are unsatisfiable at the root");
        }
    }
}

impl SolverContext for CdclContext {
    fn variables(&mut self) -> &mut VariablePool {
        &mut self.variables
    }

    fn assert_formula(&mut self, formula: Formula) {
        self.model = None;

        let true_literal = self.solver.get_true_literal();
        let encoded = self
            .encoder
            .encode(&formula, &mut self.variables, true_literal);
        self.synchronise_variables();

        for clause in encoded.definitions {
            self.add_clause(clause);
        }

        let activation_literal = self.checkpoints.last().copied();
        for mut clause in encoded.assertions {
            if let Some(activation_literal) = activation_literal {
                clause.push(!activation_literal);
            }
            self.add_clause(clause);
        }
    }

    fn push(&mut self) {
        let activation_literal = self.variables.new_literal();
        self.synchronise_variables();
        self.checkpoints.push(activation_literal);
    }

    fn pop(&mut self) -> Result<(), ContextError> {
        let activation_literal = self.checkpoints.pop().ok_or(ContextError::NoCheckpoint)?;
        self.model = None;
        self.add_clause(vec![!activation_literal]);
        Ok(())
    }

    fn set_option(&mut self, option: SolverOption) {
        match option {
            SolverOption::Timeout(timeout) => self.timeout = Some(timeout),
            SolverOption::Threads(num_threads) => {
                if num_threads > 1 {
                    warn!("The engine is sequential, the hint of {num_threads} threads is ignored");
                }
                self.num_threads = num_threads;
            }
        }
    }

    fn check(&mut self) -> CheckResult {
        self.model = None;
        self.synchronise_variables();

        let stopwatch = Stopwatch::starting_now();
        let mut termination = Combinator::new(
            self.timeout.map(TimeBudget::starting_now),
            self.interrupt.as_deref_mut(),
        );
        let flag = self
            .solver
            .solve_under_assumptions(&self.checkpoints, &mut termination);

        let result = match flag {
            SolverExecutionFlag::Feasible => {
                self.model = Some(self.solver.get_solution());
                CheckResult::Sat
            }
            SolverExecutionFlag::Infeasible | SolverExecutionFlag::InfeasibleUnderAssumptions => {
                CheckResult::Unsat
            }
            SolverExecutionFlag::Timeout => CheckResult::Unknown,
        };
        debug!(
            "Check with {} checkpoints returned {result:?} after {} ms",
            self.checkpoints.len(),
            stopwatch.elapsed().as_millis()
        );
        result
    }

    fn model(&self) -> Option<&Solution> {
        self.model.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::CdclContext;
    use crate::context::CheckResult;
    use crate::context::ContextError;
    use crate::context::SolverContext;
    use crate::context::SolverOption;
    use crate::engine::termination::TerminationCondition;
    use crate::formula::Formula;

    #[test]
    fn popped_assertions_no_longer_hold() {
        let mut context = CdclContext::default();
        let x = context.variables().new_literal();
        context.assert_formula(Formula::or([x.into(), Formula::FALSE, x.into()]));

        context.push();
        context.assert_formula(!Formula::from(x));
        assert_eq!(context.check(), CheckResult::Unsat);
        assert!(context.model().is_none());

        context.pop().expect("a checkpoint was pushed");
        assert_eq!(context.check(), CheckResult::Sat);
        let model = context.model().expect("check returned sat");
        assert!(model.get_literal_value(x));
        assert_eq!(context.num_checkpoints(), 0);
    }

    #[test]
    fn definitions_survive_a_pop() {
        let mut context = CdclContext::default();
        let x = context.variables().new_literals(2);
        let conjunction = || Formula::and([x[0].into(), x[1].into()]);

        context.push();
        context.assert_formula(conjunction());
        assert_eq!(context.check(), CheckResult::Sat);
        context.pop().expect("a checkpoint was pushed");

        context.assert_formula(!conjunction());
        context.assert_formula(Formula::from(x[0]));
        assert_eq!(context.check(), CheckResult::Sat);
        let model = context.model().expect("check returned sat");
        assert!(!model.get_literal_value(x[1]));
    }

    #[test]
    fn popping_without_checkpoint_is_an_error() {
        let mut context = CdclContext::default();

        assert_eq!(context.pop(), Err(ContextError::NoCheckpoint));
    }

    #[test]
    fn asserting_false_makes_the_context_unsat() {
        let mut context = CdclContext::default();
        context.set_option(SolverOption::Threads(1));

        context.assert_formula(Formula::FALSE);

        assert_eq!(context.check(), CheckResult::Unsat);
    }

    struct StopImmediately;

    impl TerminationCondition for StopImmediately {
        fn should_stop(&mut self) -> bool {
            true
        }
    }

    #[test]
    fn interrupted_checks_are_unknown() {
        let mut context = CdclContext::default().with_interrupt(StopImmediately);
        let x = context.variables().new_literal();
        context.assert_formula(x.into());

        assert_eq!(context.check(), CheckResult::Unknown);
    }

    #[test]
    fn elapsed_timeout_makes_checks_unknown() {
        let mut context = CdclContext::default();
        context.set_option(SolverOption::Timeout(Duration::ZERO));

        assert_eq!(context.check(), CheckResult::Unknown);
    }

    #[test]
    fn thread_hint_is_recorded() {
        let mut context = CdclContext::default();
        assert_eq!(context.num_threads(), 1);

        context.set_option(SolverOption::Threads(4));

        assert_eq!(context.num_threads(), 4);
    }
}
