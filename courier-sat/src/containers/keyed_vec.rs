use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::StorageKey;

/// A `Vec` which is indexed by a typed key, e.g. one entry per [`PropositionalVariable`] or per
/// [`Literal`]. Keys are dense, so entries are appended in key order as propositions are created.
///
/// [`PropositionalVariable`]: crate::basic_types::PropositionalVariable
/// [`Literal`]: crate::basic_types::Literal
#[derive(Debug)]
pub(crate) struct KeyedVec<Key, Value> {
    values: Vec<Value>,
    key: PhantomData<Key>,
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        KeyedVec::new(vec![])
    }
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        KeyedVec::new(self.values.clone())
    }
}

impl<Key, Value> KeyedVec<Key, Value> {
    /// The value at position `i` belongs to the key with index `i`.
    pub(crate) fn new(values: Vec<Value>) -> Self {
        KeyedVec {
            values,
            key: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    /// Adds the entry of the next key.
    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(value)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub(crate) fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.values.len()).map(Key::create_from_index)
    }

    pub(crate) fn swap(&mut self, first: Key, second: Key) {
        self.values.swap(first.index(), second.index())
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Value {
        &self.values[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Value {
        &mut self.values[key.index()]
    }
}

impl StorageKey for usize {
    fn index(&self) -> usize {
        *self
    }

    fn create_from_index(index: usize) -> Self {
        index
    }
}
