//! Flat containers indexed by dense keys, such as propositions and literals.
mod key_value_heap;
mod keyed_vec;

pub(crate) use key_value_heap::*;
pub(crate) use keyed_vec::*;

/// A key which maps onto a position in a flat container.
pub(crate) trait StorageKey {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}
