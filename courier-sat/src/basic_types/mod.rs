mod clause;
mod constraint_operation_error;
mod literal;
mod luby_sequence;
mod propagation_status_clausal;
mod propositional_variable;
mod solution;
mod solver_execution_flag;
mod stopwatch;

pub use clause::*;
pub use constraint_operation_error::*;
pub use literal::*;
pub(crate) use luby_sequence::*;
pub(crate) use propagation_status_clausal::*;
pub use propositional_variable::*;
pub use solution::*;
pub use solver_execution_flag::*;
pub use stopwatch::*;

pub(crate) type HashMap<K, V> = fnv::FnvHashMap<K, V>;
pub(crate) type HashSet<K> = fnv::FnvHashSet<K>;
