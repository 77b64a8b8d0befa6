use super::AssignmentsPropositional;
use super::ClauseAllocator;
use crate::asserts::sat_assert_simple;
use crate::basic_types::Clause;
use crate::basic_types::ClauseReference;
use crate::basic_types::HashMap;
use crate::basic_types::Literal;
use crate::basic_types::PropagationStatusClausal;
use crate::containers::KeyedVec;

/// Unit propagation with two watched literals per clause. The watched literals of a clause are
/// always at positions zero and one.
#[derive(Debug, Default)]
pub(crate) struct ClausalPropagator {
    watch_lists: KeyedVec<Literal, Vec<ClauseWatcher>>,
    next_position_on_trail_to_propagate: usize,
}

#[derive(Clone, Copy, Debug)]
struct ClauseWatcher {
    /// Some literal of the clause other than the watched one; if it is true the clause does not
    /// need to be inspected.
    cached_literal: Literal,
    clause_reference: ClauseReference,
}

impl ClausalPropagator {
    /// Adds the watch lists for both polarities of a new proposition.
    pub(crate) fn grow(&mut self) {
        self.watch_lists.push(vec![]);
        self.watch_lists.push(vec![]);
    }

    pub(crate) fn start_watching_clause_unchecked(
        &mut self,
        clause: &Clause,
        clause_reference: ClauseReference,
    ) {
        sat_assert_simple!(clause.len() >= 2);

        self.watch_lists[clause[0]].push(ClauseWatcher {
            cached_literal: clause[1],
            clause_reference,
        });
        self.watch_lists[clause[1]].push(ClauseWatcher {
            cached_literal: clause[0],
            clause_reference,
        });
    }

    pub(crate) fn propagate(
        &mut self,
        assignments: &mut AssignmentsPropositional,
        clause_allocator: &mut ClauseAllocator,
    ) -> PropagationStatusClausal {
        // kept as one function; this is the hot loop of the engine
        while self.next_position_on_trail_to_propagate < assignments.trail.len() {
            let true_literal = assignments.trail[self.next_position_on_trail_to_propagate];
            let false_literal = !true_literal;

            if self.watch_lists[false_literal].is_empty() {
                self.next_position_on_trail_to_propagate += 1;
                continue;
            }

            // watchers in [0, end_index) are kept, the others move to another watch list
            let mut end_index: usize = 0;
            let mut current_index: usize = 0;
            while current_index < self.watch_lists[false_literal].len() {
                let watcher = self.watch_lists[false_literal][current_index];
                if assignments.is_literal_assigned_true(watcher.cached_literal) {
                    self.watch_lists[false_literal][end_index] = watcher;
                    current_index += 1;
                    end_index += 1;
                    continue;
                }

                let clause_reference = watcher.clause_reference;
                let clause = clause_allocator.get_mutable_clause(clause_reference);

                if clause[0] == false_literal {
                    clause[0] = clause[1];
                    clause[1] = false_literal;
                }

                if assignments.is_literal_assigned_true(clause[0]) {
                    self.watch_lists[false_literal][end_index] = ClauseWatcher {
                        cached_literal: clause[0],
                        clause_reference,
                    };
                    current_index += 1;
                    end_index += 1;
                    continue;
                }

                let replacement_position =
                    (2..clause.len()).find(|&i| !assignments.is_literal_assigned_false(clause[i]));

                if let Some(position) = replacement_position {
                    clause[1] = clause[position];
                    clause[position] = false_literal;
                    self.watch_lists[clause[1]].push(ClauseWatcher {
                        cached_literal: clause[0],
                        clause_reference,
                    });
                    current_index += 1;
                    continue;
                }

                self.watch_lists[false_literal][end_index] = watcher;
                end_index += 1;
                current_index += 1;

                // every literal apart from clause[0] is false
                if assignments.is_literal_unassigned(clause[0]) {
                    assignments.enqueue_propagated_literal(clause[0], clause_reference.id);
                } else {
                    while current_index < self.watch_lists[false_literal].len() {
                        self.watch_lists[false_literal][end_index] =
                            self.watch_lists[false_literal][current_index];
                        current_index += 1;
                        end_index += 1;
                    }
                    self.watch_lists[false_literal].truncate(end_index);
                    return PropagationStatusClausal::ConflictDetected {
                        reason_code: clause_reference.id,
                    };
                }
            }
            self.watch_lists[false_literal].truncate(end_index);
            self.next_position_on_trail_to_propagate += 1;
        }
        PropagationStatusClausal::NoConflictDetected
    }

    pub(crate) fn synchronise(&mut self, trail_size: usize) {
        sat_assert_simple!(self.next_position_on_trail_to_propagate >= trail_size);
        self.next_position_on_trail_to_propagate = trail_size;
    }

    pub(crate) fn is_propagation_complete(&self, trail_size: usize) -> bool {
        self.next_position_on_trail_to_propagate == trail_size
    }

    pub(crate) fn remove_clause_consideration(
        &mut self,
        clause: &Clause,
        clause_reference: ClauseReference,
    ) {
        for watched_literal in [clause[0], clause[1]] {
            let watchers = &mut self.watch_lists[watched_literal];
            if let Some(position) = watchers
                .iter()
                .position(|watcher| watcher.clause_reference == clause_reference)
            {
                let _ = watchers.swap_remove(position);
            }
        }
    }

    /// Checks that every watched clause is watched exactly twice, by its first two literals, and
    /// that no watched clause is falsified. Only called from the most expensive assert level.
    pub(crate) fn debug_check_state(
        &self,
        assignments: &AssignmentsPropositional,
        clause_allocator: &ClauseAllocator,
    ) -> bool {
        let mut watch_counts: HashMap<ClauseReference, usize> = HashMap::default();
        for literal in self.watch_lists.keys() {
            for watcher in self.watch_lists[literal].iter() {
                *watch_counts.entry(watcher.clause_reference).or_insert(0) += 1;

                let clause = &clause_allocator[watcher.clause_reference];
                assert!(
                    clause[0] == literal || clause[1] == literal,
                    "Clause {clause} is in the watch list of {literal} without watching it."
                );
            }
        }

        for (clause_reference, count) in watch_counts.iter() {
            assert_eq!(*count, 2, "A clause is not watched exactly twice.");

            let clause = &clause_allocator[*clause_reference];
            assert!(
                !clause
                    .get_literal_slice()
                    .iter()
                    .all(|literal| assignments.is_literal_assigned_false(*literal)),
                "The propagator missed the falsified clause {clause}."
            );
        }
        true
    }
}
