mod assignments_propositional;
mod clausal_propagator;
mod clause_allocator;
mod propositional_value_selector;
mod propositional_variable_selector;

pub(crate) use assignments_propositional::*;
pub(crate) use clausal_propagator::*;
pub(crate) use clause_allocator::*;
pub(crate) use propositional_value_selector::*;
pub(crate) use propositional_variable_selector::*;
