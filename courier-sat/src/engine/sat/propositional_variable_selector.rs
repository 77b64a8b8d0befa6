use rand::rngs::SmallRng;
use rand::Rng;

use super::AssignmentsPropositional;
use crate::basic_types::PropositionalVariable;
use crate::containers::KeyValueHeap;

/// VSIDS: propositions taking part in conflicts get their activity bumped, and the proposition
/// with the highest activity is decided on next.
#[derive(Debug)]
pub(crate) struct PropositionalVariableSelector {
    heap: KeyValueHeap<PropositionalVariable, f64>,
    increment: f64,
    max_threshold: f64,
    decay_factor: f64,
}

impl PropositionalVariableSelector {
    pub(crate) fn new(decay_factor: f64) -> PropositionalVariableSelector {
        PropositionalVariableSelector {
            heap: KeyValueHeap::default(),
            increment: 1.0,
            max_threshold: 1e100,
            decay_factor,
        }
    }

    /// Registers the next proposition with a tiny random activity, so ties are broken by the
    /// random seed rather than by creation order.
    pub(crate) fn grow(
        &mut self,
        variable: PropositionalVariable,
        random_generator: &mut SmallRng,
    ) {
        let initial_activity = random_generator.gen_range(0.0..1e-5);
        self.heap.grow(variable, initial_activity);
    }

    pub(crate) fn bump_activity(&mut self, variable: PropositionalVariable) {
        let activity = *self.heap.get_value(variable);
        if activity + self.increment >= self.max_threshold {
            self.heap.divide_values(self.max_threshold);
            self.increment /= self.max_threshold;
        }
        self.heap.increment(variable, self.increment);
    }

    pub(crate) fn restore(&mut self, variable: PropositionalVariable) {
        self.heap.restore_key(variable);
    }

    /// Decaying is done by growing the increment, which makes later bumps weigh more.
    pub(crate) fn decay_activities(&mut self) {
        self.increment *= 1.0 / self.decay_factor;
    }

    pub(crate) fn peek_next_variable(
        &mut self,
        assignments: &AssignmentsPropositional,
    ) -> Option<PropositionalVariable> {
        // assigned propositions are only removed from the heap lazily
        while let Some((&candidate, _)) = self.heap.peek_max() {
            if assignments.is_variable_assigned(candidate) {
                let _ = self.heap.pop_max();
            } else {
                return Some(candidate);
            }
        }
        None
    }
}
