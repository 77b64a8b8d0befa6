//! A max-heap over keys in `[0, n)` with non-negative values. Keys can be removed temporarily and
//! restored later with their old value, which is what variable selection needs on backtracking.
use std::ops::AddAssign;
use std::ops::DivAssign;

use super::KeyedVec;
use super::StorageKey;
use crate::asserts::sat_assert_extreme;
use crate::asserts::sat_assert_moderate;
use crate::basic_types::HashSet;

#[derive(Debug)]
pub(crate) struct KeyValueHeap<Key: StorageKey, Value> {
    /// The values stored as a heap; the value of key `i` is at index `map_key_to_position[i]`.
    values: Vec<Value>,
    map_key_to_position: KeyedVec<Key, usize>,
    map_position_to_key: Vec<Key>,
    /// Positions `[0, end_position)` form the heap; the remaining positions hold removed keys.
    end_position: usize,
}

impl<Key: StorageKey, Value> Default for KeyValueHeap<Key, Value> {
    fn default() -> Self {
        Self {
            values: Default::default(),
            map_key_to_position: Default::default(),
            map_position_to_key: Default::default(),
            end_position: Default::default(),
        }
    }
}

impl<Key, Value> KeyValueHeap<Key, Value>
where
    Key: StorageKey + Copy,
    Value: AddAssign<Value> + DivAssign<Value> + PartialOrd + Default + Copy,
{
    /// Return the key with maximum value from the heap, or None if the heap is empty. Note that
    /// this does not delete the key (see [`KeyValueHeap::pop_max`] to get and delete).
    ///
    /// The time-complexity of this operation is O(1)
    pub(crate) fn peek_max(&self) -> Option<(&Key, &Value)> {
        if self.is_empty() {
            None
        } else {
            Some((&self.map_position_to_key[0], &self.values[0]))
        }
    }

    pub(crate) fn get_value(&self, key: Key) -> &Value {
        sat_assert_moderate!(
            key.index() < self.map_key_to_position.len(),
            "Attempted to get key with index {} for a map with length {}",
            key.index(),
            self.map_key_to_position.len()
        );
        &self.values[self.map_key_to_position[key]]
    }

    /// Deletes the key with maximum value from the heap and returns it, or None if the heap is
    /// empty.
    ///
    /// The time-complexity of this operation is O(logn)
    pub(crate) fn pop_max(&mut self) -> Option<Key> {
        if self.is_empty() {
            return None;
        }

        let best_key = self.map_position_to_key[0];
        sat_assert_moderate!(0 == self.map_key_to_position[best_key]);
        self.delete_key(best_key);
        Some(best_key)
    }

    /// Increments the value of the element of 'key' by 'increment'. The key does not need to be
    /// present in the heap.
    ///
    /// The worst-case time-complexity of this operation is O(logn)
    pub(crate) fn increment(&mut self, key: Key, increment: Value) {
        let position = self.map_key_to_position[key];
        self.values[position] += increment;
        if self.is_key_present(key) {
            self.sift_up(position);
        }
    }

    /// Restores the entry with key 'key' to the heap if the key is not present, otherwise does
    /// nothing. Its value is the previous value used before 'delete_key' was called.
    pub(crate) fn restore_key(&mut self, key: Key) {
        if !self.is_key_present(key) {
            let position = self.map_key_to_position[key];
            sat_assert_moderate!(position >= self.end_position);
            self.swap_positions(position, self.end_position);
            self.end_position += 1;
            self.sift_up(self.end_position - 1);
        }
    }

    /// Removes the entry with key 'key' (temporarily) from the heap if the key is present,
    /// otherwise does nothing. Its value remains recorded internally and is available upon
    /// calling [`KeyValueHeap::restore_key`].
    pub(crate) fn delete_key(&mut self, key: Key) {
        if self.is_key_present(key) {
            let position = self.map_key_to_position[key];
            self.swap_positions(position, self.end_position - 1);
            self.end_position -= 1;
            if position < self.end_position {
                self.sift_down(position);
            }
        }
    }

    /// Returns whether there are elements left in the heap (excluding the "removed" values)
    pub(crate) fn is_empty(&self) -> bool {
        self.end_position == 0
    }

    pub(crate) fn is_key_present(&self, key: Key) -> bool {
        self.map_key_to_position[key] < self.end_position
    }

    /// Increases the size of the heap by one; the new key must be the next unused key index.
    pub(crate) fn grow(&mut self, key: Key, value: Value) {
        sat_assert_moderate!(key.index() == self.values.len());

        let last_index = self.values.len();
        self.values.push(value);
        self.map_key_to_position.push(last_index);
        self.map_position_to_key.push(key);

        self.swap_positions(self.end_position, last_index);
        self.end_position += 1;
        self.sift_up(self.end_position - 1);
    }

    /// Divides all the values in the heap by 'divisor', including the values of removed keys.
    ///
    /// The run-time complexity of this operation is O(n)
    pub(crate) fn divide_values(&mut self, divisor: Value) {
        for value in self.values.iter_mut() {
            *value /= divisor;
        }
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        let key_i = self.map_position_to_key[a];
        let key_j = self.map_position_to_key[b];

        self.values.swap(a, b);
        self.map_position_to_key.swap(a, b);
        self.map_key_to_position.swap(key_i, key_j);

        sat_assert_moderate!(
            self.map_key_to_position[key_i] == b && self.map_key_to_position[key_j] == a
        );
        sat_assert_extreme!(
            self.map_key_to_position
                .iter()
                .collect::<HashSet<&usize>>()
                .len()
                == self.map_key_to_position.len()
        );
    }

    fn sift_up(&mut self, position: usize) {
        let mut position = position;
        while position > 0 {
            let parent_position = Self::get_parent_position(position);
            if self.values[parent_position] >= self.values[position] {
                break;
            }
            self.swap_positions(parent_position, position);
            position = parent_position;
        }
    }

    fn sift_down(&mut self, position: usize) {
        sat_assert_moderate!(position < self.end_position);

        let mut position = position;
        while let Some(largest_child_position) = self.get_largest_child_position(position) {
            if self.values[position] >= self.values[largest_child_position] {
                break;
            }
            self.swap_positions(largest_child_position, position);
            position = largest_child_position;
        }
    }

    fn get_largest_child_position(&self, position: usize) -> Option<usize> {
        let left_child_position = 2 * position + 1;
        let right_child_position = 2 * position + 2;

        if left_child_position >= self.end_position {
            None
        } else if right_child_position < self.end_position
            && self.values[right_child_position] > self.values[left_child_position]
        {
            Some(right_child_position)
        } else {
            Some(left_child_position)
        }
    }

    fn get_parent_position(child_position: usize) -> usize {
        sat_assert_moderate!(child_position > 0, "Root has no parent.");
        (child_position - 1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::KeyValueHeap;

    fn heap_with_values(values: &[f64]) -> KeyValueHeap<usize, f64> {
        let mut heap = KeyValueHeap::default();
        for (key, value) in values.iter().enumerate() {
            heap.grow(key, *value);
        }
        heap
    }

    #[test]
    fn pop_max_returns_keys_in_decreasing_value_order() {
        let mut heap = heap_with_values(&[5.0, 1.0, 8.0, 3.0, 7.0]);

        let popped = std::iter::from_fn(|| heap.pop_max()).collect::<Vec<_>>();

        assert_eq!(popped, vec![2, 4, 0, 3, 1]);
        assert!(heap.is_empty());
        assert_eq!(*heap.get_value(4), 7.0);
    }

    #[test]
    fn restored_keys_keep_their_value() {
        let mut heap = heap_with_values(&[5.0, 1.0, 8.0]);

        heap.delete_key(2);
        assert_eq!(heap.peek_max().map(|(key, _)| *key), Some(0));

        heap.restore_key(2);
        assert_eq!(heap.peek_max(), Some((&2, &8.0)));
    }

    #[test]
    fn incrementing_a_removed_key_takes_effect_once_restored() {
        let mut heap = heap_with_values(&[5.0, 1.0, 8.0]);

        heap.delete_key(1);
        heap.increment(1, 10.0);
        assert_eq!(heap.peek_max().map(|(key, _)| *key), Some(2));

        heap.restore_key(1);
        assert_eq!(heap.peek_max().map(|(key, _)| *key), Some(1));
        assert_eq!(*heap.get_value(1), 11.0);
    }

    #[test]
    fn dividing_values_preserves_the_order() {
        let mut heap = heap_with_values(&[2.0, 6.0, 4.0]);

        heap.divide_values(2.0);

        assert_eq!(heap.peek_max(), Some((&1, &3.0)));
        assert_eq!(*heap.get_value(0), 1.0);
    }

    #[test]
    fn pop_on_empty_heap_is_none() {
        let mut heap: KeyValueHeap<usize, f64> = KeyValueHeap::default();

        assert_eq!(heap.pop_max(), None);
        assert_eq!(heap.peek_max(), None);
    }
}
