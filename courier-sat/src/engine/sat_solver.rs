use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::sat::AssignmentsPropositional;
use super::sat::ClausalPropagator;
use super::sat::ClauseAllocator;
use super::sat::PropositionalValueSelector;
use super::sat::PropositionalVariableSelector;
use super::termination::TerminationCondition;
use crate::asserts::sat_assert_eq_simple;
use crate::asserts::sat_assert_extreme;
use crate::asserts::sat_assert_moderate;
use crate::asserts::sat_assert_simple;
use crate::basic_types::ClauseReference;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Literal;
use crate::basic_types::LubySequence;
use crate::basic_types::PropagationStatusClausal;
use crate::basic_types::PropositionalVariable;
use crate::basic_types::Solution;
use crate::basic_types::SolverExecutionFlag;
use crate::containers::KeyedVec;

/// Options which steer the search of the [`SatSolver`].
#[derive(Clone, Copy, Debug)]
pub struct SatSolverOptions {
    /// Seeds the tie-breaking of the variable selection.
    pub random_seed: u64,
    /// The number of conflicts between restarts is this base times the next Luby number.
    pub restart_base: i64,
    /// The learned clause database is shrunk to this size at restarts.
    pub learned_clause_limit: usize,
    pub variable_decay_factor: f64,
    pub clause_activity_decay_factor: f32,
    pub max_clause_activity: f32,
}

impl Default for SatSolverOptions {
    fn default() -> Self {
        SatSolverOptions {
            random_seed: 42,
            restart_base: 100,
            learned_clause_limit: 4000,
            variable_decay_factor: 0.95,
            clause_activity_decay_factor: 0.99,
            max_clause_activity: 1e20,
        }
    }
}

/// A conflict-driven clause-learning engine over propositional clauses.
///
/// Proposition zero is reserved: it is assigned true at the root when the engine is created and
/// is available through [`SatSolver::get_true_literal`]. Clauses can be added between calls to
/// [`SatSolver::solve_under_assumptions`]; the engine moves back to the root by itself when
/// needed.
#[derive(Debug)]
pub struct SatSolver {
    state: SatSolverState,
    assignments: AssignmentsPropositional,
    variable_selector: PropositionalVariableSelector,
    value_selector: PropositionalValueSelector,
    clausal_propagator: ClausalPropagator,
    clause_allocator: ClauseAllocator,
    learned_clauses: Vec<ClauseReference>,
    assumptions: Vec<Literal>,
    seen: KeyedVec<PropositionalVariable, bool>,
    restart_sequence: LubySequence,
    num_conflicts_until_restart: i64,
    clause_bump_increment: f32,
    random_generator: SmallRng,
    counters: Counters,
    options: SatSolverOptions,
    true_literal: Literal,
}

impl Default for SatSolver {
    fn default() -> Self {
        SatSolver::new(SatSolverOptions::default())
    }
}

// methods that offer basic functionality
impl SatSolver {
    pub fn new(options: SatSolverOptions) -> SatSolver {
        let mut restart_sequence = LubySequence::new(options.restart_base);
        let num_conflicts_until_restart = restart_sequence.next();

        let mut solver = SatSolver {
            state: SatSolverState::Ready,
            assignments: AssignmentsPropositional::default(),
            variable_selector: PropositionalVariableSelector::new(options.variable_decay_factor),
            value_selector: PropositionalValueSelector::default(),
            clausal_propagator: ClausalPropagator::default(),
            clause_allocator: ClauseAllocator::default(),
            learned_clauses: vec![],
            assumptions: vec![],
            seen: KeyedVec::default(),
            restart_sequence,
            num_conflicts_until_restart,
            clause_bump_increment: 1.0,
            random_generator: SmallRng::seed_from_u64(options.random_seed),
            counters: Counters::default(),
            options,
            true_literal: Literal::new(PropositionalVariable::new(0), true),
        };

        let root_variable = solver.create_new_propositional_variable();
        solver.true_literal = Literal::new(root_variable, true);
        solver
            .assignments
            .enqueue_decision_literal(solver.true_literal);
        solver.propagate_enqueued();

        solver
    }

    pub fn get_true_literal(&self) -> Literal {
        self.true_literal
    }

    pub fn num_propositional_variables(&self) -> u32 {
        self.assignments.num_propositional_variables()
    }

    pub fn create_new_propositional_variable(&mut self) -> PropositionalVariable {
        let variable = PropositionalVariable::new(self.assignments.num_propositional_variables());

        self.assignments.grow();
        self.value_selector.grow();
        self.clausal_propagator.grow();
        self.seen.push(false);
        self.variable_selector
            .grow(variable, &mut self.random_generator);

        variable
    }

    /// Adds a clause which has to hold in every solution from now on.
    ///
    /// Literals which are false at the root are dropped and clauses which are satisfied at the
    /// root are ignored. If the clause is falsified at the root the engine becomes infeasible,
    /// and every later call reports that.
    pub fn add_clause(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
    ) -> Result<(), ConstraintOperationError> {
        if self.state.is_infeasible() {
            return Err(ConstraintOperationError::InfeasibleState);
        }
        self.restore_state_at_root();

        let literals = literals.into_iter().collect::<Vec<_>>();
        sat_assert_simple!(
            literals.iter().all(|literal| {
                literal.get_propositional_variable().get_index() < self.num_propositional_variables()
            }),
            "Clauses can only mention propositions created by the engine."
        );

        let Some(literals) = self.preprocess_clause(literals) else {
            return Ok(());
        };
        self.counters.num_permanent_clauses += 1;

        match literals.len() {
            0 => {
                self.state = SatSolverState::Infeasible;
                Err(ConstraintOperationError::InfeasibleClause)
            }
            1 => {
                self.assignments.enqueue_decision_literal(literals[0]);
                self.propagate_enqueued();
                if self.state.conflict_detected() {
                    self.state = SatSolverState::Infeasible;
                    Err(ConstraintOperationError::InfeasibleClause)
                } else {
                    Ok(())
                }
            }
            _ => {
                let _ = self.add_clause_unchecked(literals, false);
                Ok(())
            }
        }
    }

    pub fn solve(&mut self, termination: &mut impl TerminationCondition) -> SolverExecutionFlag {
        self.solve_under_assumptions(&[], termination)
    }

    /// Searches for an assignment which satisfies every clause and sets every assumption to
    /// true. Assumption `i` is decided at decision level `i + 1`.
    pub fn solve_under_assumptions(
        &mut self,
        assumptions: &[Literal],
        termination: &mut impl TerminationCondition,
    ) -> SolverExecutionFlag {
        if self.state.is_infeasible() {
            return SolverExecutionFlag::Infeasible;
        }
        self.restore_state_at_root();

        self.assumptions = assumptions.to_vec();
        self.state = SatSolverState::Solving;

        let flag = self.solve_internal(termination);
        self.counters.log();
        flag
    }

    /// The assignment found by the last call to [`SatSolver::solve_under_assumptions`]; only
    /// available while nothing has been added to the engine since.
    pub fn get_solution(&self) -> Solution {
        sat_assert_simple!(
            self.state.has_solution(),
            "A solution is only available after a feasible solve."
        );

        let truth_values = (0..self.assignments.num_propositional_variables())
            .map(|index| {
                self.assignments
                    .is_variable_assigned_true(PropositionalVariable::new(index))
            })
            .collect();
        Solution::new(KeyedVec::new(truth_values))
    }

    /// The assumption which was found to be false by the last solve, if it ended with
    /// [`SolverExecutionFlag::InfeasibleUnderAssumptions`].
    pub fn get_violated_assumption(&self) -> Option<Literal> {
        match self.state {
            SatSolverState::InfeasibleUnderAssumptions {
                violated_assumption,
            } => Some(violated_assumption),
            _ => None,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        self.state.is_infeasible()
    }
}

// methods that serve as the main building blocks
impl SatSolver {
    fn solve_internal(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> SolverExecutionFlag {
        loop {
            if termination.should_stop() {
                self.state = SatSolverState::Timeout;
                return SolverExecutionFlag::Timeout;
            }

            self.propagate_enqueued();

            if let SatSolverState::Conflict {
                conflict_clause_reference,
            } = self.state
            {
                if self.assignments.is_at_the_root_level() {
                    self.state = SatSolverState::Infeasible;
                    return SolverExecutionFlag::Infeasible;
                }

                let analysis_result = self.analyse_conflict(conflict_clause_reference);
                self.process_conflict_analysis_result(analysis_result);
                self.state = SatSolverState::Solving;

                self.decay_clause_activities();
                self.variable_selector.decay_activities();
                continue;
            }

            if self.should_restart() {
                self.perform_restart_during_search();
            }

            self.assignments.increase_decision_level();

            match self.get_next_branching_decision() {
                Some(BranchingDecision::Assumption { assumption_literal }) => {
                    if self.assignments.is_literal_unassigned(assumption_literal) {
                        self.assignments
                            .enqueue_decision_literal(assumption_literal);
                    } else if self.assignments.is_literal_assigned_false(assumption_literal) {
                        self.state = SatSolverState::InfeasibleUnderAssumptions {
                            violated_assumption: assumption_literal,
                        };
                        return SolverExecutionFlag::InfeasibleUnderAssumptions;
                    }
                    // an assumption which is already true leaves its decision level empty
                }
                Some(BranchingDecision::StandardDecision { decision_literal }) => {
                    self.counters.num_decisions += 1;
                    termination.decision_has_been_made();
                    self.assignments.enqueue_decision_literal(decision_literal);
                }
                None => {
                    self.state = SatSolverState::ContainsSolution;
                    return SolverExecutionFlag::Feasible;
                }
            }
        }
    }

    fn get_next_branching_decision(&mut self) -> Option<BranchingDecision> {
        let decision_level = self.assignments.get_decision_level() as usize;
        if decision_level <= self.assumptions.len() {
            return Some(BranchingDecision::Assumption {
                assumption_literal: self.assumptions[decision_level - 1],
            });
        }

        self.variable_selector
            .peek_next_variable(&self.assignments)
            .map(|variable| {
                let decision_literal =
                    Literal::new(variable, self.value_selector.select_value(variable));
                BranchingDecision::StandardDecision { decision_literal }
            })
    }

    fn propagate_enqueued(&mut self) {
        let num_assigned_before = self.assignments.num_assigned_propositional_variables();

        let status = self
            .clausal_propagator
            .propagate(&mut self.assignments, &mut self.clause_allocator);

        if let PropagationStatusClausal::ConflictDetected { reason_code } = status {
            self.state = SatSolverState::Conflict {
                conflict_clause_reference: ClauseReference { id: reason_code },
            };
            self.counters.num_conflicts += 1;
            self.num_conflicts_until_restart -= 1;
        }

        self.counters.num_propagations +=
            (self.assignments.num_assigned_propositional_variables() - num_assigned_before) as u64;
    }

    /// Derives the first unique implication point clause. The asserting literal is placed at
    /// index zero and the literal with the highest remaining decision level at index one.
    fn analyse_conflict(&mut self, conflict_reference: ClauseReference) -> ConflictAnalysisResult {
        let current_decision_level = self.assignments.get_decision_level();

        let mut analysis_result = ConflictAnalysisResult {
            // placeholder for the asserting literal
            learned_literals: vec![self.true_literal],
            backjump_level: 0,
        };

        let mut num_current_decision_level_literals = 0;
        let mut next_trail_index = self.assignments.trail.len() - 1;
        let mut next_literal: Option<Literal> = None;
        loop {
            let reason_clause_reference = match next_literal {
                Some(propagated_literal) => {
                    sat_assert_moderate!(
                        self.assignments.is_literal_propagated(propagated_literal)
                    );
                    ClauseReference {
                        id: self.assignments.get_literal_reason_code(propagated_literal),
                    }
                }
                None => conflict_reference,
            };

            self.update_clause_lbd_and_bump_activity(reason_clause_reference);

            // the propagated literal sits at index zero of its reason and is skipped
            let start_index = next_literal.is_some() as usize;
            for index in start_index..self.clause_allocator[reason_clause_reference].len() {
                let reason_literal = self.clause_allocator[reason_clause_reference][index];
                let variable = reason_literal.get_propositional_variable();
                if self.seen[variable] || self.assignments.is_literal_root_assignment(reason_literal) {
                    continue;
                }

                self.seen[variable] = true;
                self.variable_selector.bump_activity(variable);

                let literal_decision_level =
                    self.assignments.get_literal_assignment_level(reason_literal);
                if literal_decision_level == current_decision_level {
                    num_current_decision_level_literals += 1;
                } else {
                    analysis_result.learned_literals.push(reason_literal);
                    if literal_decision_level > analysis_result.backjump_level {
                        analysis_result.backjump_level = literal_decision_level;
                        let last_index = analysis_result.learned_literals.len() - 1;
                        analysis_result.learned_literals.swap(1, last_index);
                    }
                }
            }

            // only literals which were seen are part of the conflict
            while !self.seen[self.assignments.trail[next_trail_index].get_propositional_variable()]
            {
                next_trail_index -= 1;
            }

            let literal = self.assignments.trail[next_trail_index];
            sat_assert_moderate!(
                self.assignments.get_literal_assignment_level(literal) == current_decision_level
            );
            self.seen[literal.get_propositional_variable()] = false;
            next_literal = Some(literal);
            num_current_decision_level_literals -= 1;

            if num_current_decision_level_literals == 0 {
                analysis_result.learned_literals[0] = !literal;
                break;
            }
            next_trail_index -= 1;
        }

        for literal in analysis_result.learned_literals.iter() {
            self.seen[literal.get_propositional_variable()] = false;
        }

        analysis_result
    }

    fn process_conflict_analysis_result(&mut self, analysis_result: ConflictAnalysisResult) {
        // unit clauses are assigned at the root rather than stored
        if analysis_result.learned_literals.len() == 1 {
            self.backtrack(0);
            let unit_clause = analysis_result.learned_literals[0];
            sat_assert_simple!(self.assignments.is_literal_unassigned(unit_clause));

            self.counters.num_unit_clauses_learned += 1;
            self.assignments.enqueue_decision_literal(unit_clause);
            return;
        }

        let lbd = self.compute_lbd_for_literals(&analysis_result.learned_literals);
        self.backtrack(analysis_result.backjump_level);

        let propagated_literal = analysis_result.learned_literals[0];
        let learned_clause_reference =
            self.add_clause_unchecked(analysis_result.learned_literals, true);
        if lbd < self.clause_allocator[learned_clause_reference].get_lbd() {
            self.clause_allocator[learned_clause_reference].update_lbd(lbd);
        }

        self.assignments
            .enqueue_propagated_literal(propagated_literal, learned_clause_reference.id);
    }

    fn should_restart(&self) -> bool {
        self.num_conflicts_until_restart <= 0
    }

    fn perform_restart_during_search(&mut self) {
        if !self.assignments.is_at_the_root_level() {
            self.backtrack(0);
        }
        self.shrink_learned_clause_database_if_needed();

        self.num_conflicts_until_restart = self.restart_sequence.next();
        self.counters.num_restarts += 1;
    }

    fn restore_state_at_root(&mut self) {
        if !self.assignments.is_at_the_root_level() {
            self.backtrack(0);
        }
        if !self.state.is_infeasible() {
            self.state = SatSolverState::Ready;
        }
    }

    fn backtrack(&mut self, backtrack_level: u32) {
        sat_assert_simple!(backtrack_level < self.assignments.get_decision_level());

        let num_assignments_for_removal = self.assignments.trail.len()
            - self.assignments.trail_delimiter[backtrack_level as usize] as usize;

        for _ in 0..num_assignments_for_removal {
            if let Some(last_literal) = self.assignments.pop_trail() {
                let variable = last_literal.get_propositional_variable();
                self.variable_selector.restore(variable);
                self.value_selector
                    .update(variable, last_literal.is_positive());
            }
        }

        self.assignments.synchronise(backtrack_level);
        sat_assert_eq_simple!(self.assignments.get_decision_level(), backtrack_level);
        self.clausal_propagator
            .synchronise(self.assignments.trail.len());
    }
}

// clause database management
impl SatSolver {
    fn add_clause_unchecked(
        &mut self,
        literals: Vec<Literal>,
        is_learned: bool,
    ) -> ClauseReference {
        sat_assert_moderate!(
            self.clausal_propagator
                .is_propagation_complete(self.assignments.trail.len()),
            "Clauses can only be added once propagation is complete."
        );

        let clause_reference = self.clause_allocator.create_clause(literals, is_learned);
        self.clausal_propagator.start_watching_clause_unchecked(
            &self.clause_allocator[clause_reference],
            clause_reference,
        );

        if is_learned {
            self.learned_clauses.push(clause_reference);
            self.counters.num_learned_clauses += 1;
        }

        clause_reference
    }

    /// Returns [`None`] when the clause is satisfied at the root, otherwise the clause without
    /// root-falsified and duplicate literals.
    fn preprocess_clause(&self, mut literals: Vec<Literal>) -> Option<Vec<Literal>> {
        sat_assert_simple!(self.assignments.is_at_the_root_level());

        if literals
            .iter()
            .any(|literal| self.assignments.is_literal_assigned_true(*literal))
        {
            return None;
        }
        literals.retain(|literal| !self.assignments.is_literal_assigned_false(*literal));

        // both polarities of a proposition become neighbours after sorting
        literals.sort_unstable();
        literals.dedup();
        let is_tautology = literals.windows(2).any(|pair| {
            pair[0].get_propositional_variable() == pair[1].get_propositional_variable()
        });

        (!is_tautology).then_some(literals)
    }

    fn shrink_learned_clause_database_if_needed(&mut self) {
        sat_assert_moderate!(self.assignments.is_at_the_root_level());

        if self.learned_clauses.len() <= self.options.learned_clause_limit {
            return;
        }

        // best clauses first: low lbd, then high activity
        let clause_allocator = &self.clause_allocator;
        self.learned_clauses.sort_unstable_by(|first, second| {
            let first = &clause_allocator[*first];
            let second = &clause_allocator[*second];
            first
                .get_lbd()
                .cmp(&second.get_lbd())
                .then_with(|| second.get_activity().total_cmp(&first.get_activity()))
        });

        let mut num_clauses_to_remove =
            self.learned_clauses.len() - self.options.learned_clause_limit;
        let mut kept_clauses = Vec::with_capacity(self.options.learned_clause_limit);
        for clause_reference in std::mem::take(&mut self.learned_clauses).into_iter().rev() {
            if num_clauses_to_remove == 0 {
                kept_clauses.push(clause_reference);
            } else if self.clause_allocator[clause_reference].is_protected_against_deletion() {
                self.clause_allocator[clause_reference].clear_protection_against_deletion();
                kept_clauses.push(clause_reference);
            } else {
                self.clausal_propagator.remove_clause_consideration(
                    &self.clause_allocator[clause_reference],
                    clause_reference,
                );
                self.clause_allocator.delete_clause(clause_reference);
                num_clauses_to_remove -= 1;
            }
        }
        self.learned_clauses = kept_clauses;
        debug!(
            "Reduced the learned clauses, {} clauses remain",
            self.clause_allocator.num_live_clauses()
        );

        sat_assert_extreme!(self
            .clausal_propagator
            .debug_check_state(&self.assignments, &self.clause_allocator));
    }

    fn update_clause_lbd_and_bump_activity(&mut self, clause_reference: ClauseReference) {
        let clause = &self.clause_allocator[clause_reference];
        if !clause.is_learned() || clause.get_lbd() <= 2 {
            return;
        }

        self.bump_clause_activity(clause_reference);

        let new_lbd = self
            .compute_lbd_for_literals(self.clause_allocator[clause_reference].get_literal_slice());
        if new_lbd < self.clause_allocator[clause_reference].get_lbd() {
            let clause = &mut self.clause_allocator[clause_reference];
            clause.update_lbd(new_lbd);
            clause.mark_protection_against_deletion();
        }
    }

    /// The number of distinct decision levels among the literals, which all have to be assigned.
    fn compute_lbd_for_literals(&self, literals: &[Literal]) -> u32 {
        let mut levels = literals
            .iter()
            .map(|literal| self.assignments.get_literal_assignment_level(*literal))
            .collect::<Vec<_>>();
        levels.sort_unstable();
        levels.dedup();
        levels.len() as u32
    }

    fn bump_clause_activity(&mut self, clause_reference: ClauseReference) {
        if self.clause_allocator[clause_reference].get_activity() + self.clause_bump_increment
            > self.options.max_clause_activity
        {
            self.rescale_clause_activities();
        }
        self.clause_allocator[clause_reference].increase_activity(self.clause_bump_increment);
    }

    fn rescale_clause_activities(&mut self) {
        for clause_reference in self.learned_clauses.iter() {
            self.clause_allocator[*clause_reference]
                .divide_activity(self.options.max_clause_activity);
        }
        self.clause_bump_increment /= self.options.max_clause_activity;
    }

    fn decay_clause_activities(&mut self) {
        self.clause_bump_increment /= self.options.clause_activity_decay_factor;
    }
}

#[derive(Debug)]
struct ConflictAnalysisResult {
    learned_literals: Vec<Literal>,
    backjump_level: u32,
}

#[derive(Clone, Copy, Debug)]
enum BranchingDecision {
    Assumption { assumption_literal: Literal },
    StandardDecision { decision_literal: Literal },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SatSolverState {
    Ready,
    Solving,
    ContainsSolution,
    Conflict {
        conflict_clause_reference: ClauseReference,
    },
    Infeasible,
    InfeasibleUnderAssumptions {
        violated_assumption: Literal,
    },
    Timeout,
}

impl SatSolverState {
    fn conflict_detected(&self) -> bool {
        matches!(self, SatSolverState::Conflict { .. })
    }

    fn is_infeasible(&self) -> bool {
        *self == SatSolverState::Infeasible
    }

    fn has_solution(&self) -> bool {
        *self == SatSolverState::ContainsSolution
    }
}

#[derive(Debug, Default)]
struct Counters {
    num_decisions: u64,
    num_conflicts: u64,
    num_propagations: u64,
    num_restarts: u64,
    num_permanent_clauses: u64,
    num_learned_clauses: u64,
    num_unit_clauses_learned: u64,
}

impl Counters {
    fn log(&self) {
        debug!(
            "Engine statistics: decisions={} conflicts={} propagations={} restarts={} \
             permanent clauses={} learned clauses={} learned units={}",
            self.num_decisions,
            self.num_conflicts,
            self.num_propagations,
            self.num_restarts,
            self.num_permanent_clauses,
            self.num_learned_clauses,
            self.num_unit_clauses_learned
        );
    }
}
