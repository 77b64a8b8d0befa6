use crate::basic_types::Literal;
use crate::basic_types::PropositionalVariable;

/// Hands out fresh propositions from a monotonic counter.
///
/// Proposition zero is reserved for the constant true literal of the solver context, so the first
/// proposition handed out has index one.
#[derive(Debug)]
#[allow(
    missing_copy_implementations,
    reason = "copying a pool would hand out the same propositions twice"
)]
pub struct VariablePool {
    next_index: u32,
}

impl Default for VariablePool {
    fn default() -> Self {
        VariablePool { next_index: 1 }
    }
}

impl VariablePool {
    pub fn new_variable(&mut self) -> PropositionalVariable {
        let variable = PropositionalVariable::new(self.next_index);
        self.next_index += 1;
        variable
    }

    pub fn new_literal(&mut self) -> Literal {
        Literal::new(self.new_variable(), true)
    }

    pub fn new_literals(&mut self, num_literals: usize) -> Vec<Literal> {
        (0..num_literals).map(|_| self.new_literal()).collect()
    }

    /// The number of propositions handed out so far, including the reserved one.
    pub fn num_variables(&self) -> u32 {
        self.next_index
    }

    /// The literal which the solver context fixes to true.
    pub fn true_literal(&self) -> Literal {
        Literal::new(PropositionalVariable::new(0), true)
    }
}
