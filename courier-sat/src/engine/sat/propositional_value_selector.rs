use crate::basic_types::PropositionalVariable;
use crate::containers::KeyedVec;

/// Phase saving: a proposition is decided on the value it had when it was last unassigned.
#[derive(Debug, Default)]
pub(crate) struct PropositionalValueSelector {
    truth_values: KeyedVec<PropositionalVariable, bool>,
}

impl PropositionalValueSelector {
    pub(crate) fn grow(&mut self) {
        self.truth_values.push(false);
    }

    pub(crate) fn select_value(&self, variable: PropositionalVariable) -> bool {
        self.truth_values[variable]
    }

    pub(crate) fn update(&mut self, variable: PropositionalVariable, new_truth_value: bool) {
        self.truth_values[variable] = new_truth_value;
    }
}
