use super::Literal;
use super::PropositionalVariable;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A snapshot of a satisfying assignment.
///
/// Propositions which the engine never saw (for instance ones minted after the last check) are
/// absent from the snapshot. Lookups of absent propositions report `false` rather than failing,
/// so that decoding never depends on which propositions ended up in the clause database.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    truth_values: KeyedVec<PropositionalVariable, bool>,
}

impl Solution {
    pub(crate) fn new(truth_values: KeyedVec<PropositionalVariable, bool>) -> Solution {
        Solution { truth_values }
    }

    pub fn num_propositional_variables(&self) -> usize {
        self.truth_values.len()
    }

    /// Returns the value of the variable, or [`None`] if the variable is not part of the
    /// snapshot.
    pub fn get_variable_value(&self, variable: PropositionalVariable) -> Option<bool> {
        (variable.index() < self.truth_values.len()).then(|| self.truth_values[variable])
    }

    pub fn get_literal_value(&self, literal: Literal) -> bool {
        self.get_variable_value(literal.get_propositional_variable())
            .map(|value| value == literal.is_positive())
            .unwrap_or(false)
    }
}
