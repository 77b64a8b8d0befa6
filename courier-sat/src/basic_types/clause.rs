use itertools::Itertools;

use super::Literal;
use crate::asserts::sat_assert_advanced;
use crate::asserts::sat_assert_moderate;
use crate::asserts::sat_assert_simple;

/// Handle to a clause stored in the [`crate::engine::sat::ClauseAllocator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClauseReference {
    pub(crate) id: u32,
}

/// A disjunction of at least two literals. Unit clauses never become [`Clause`]s, they are
/// assigned at the root instead.
///
/// The first two literals are the watched literals; the clausal propagator reorders the
/// literals in place to maintain this.
#[derive(Clone, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
    is_learned: bool,
    is_deleted: bool,
    is_protected_against_deletion: bool,
    lbd: u32,
    activity: f32,
}

impl Clause {
    pub fn new(literals: Vec<Literal>, is_learned: bool) -> Clause {
        sat_assert_simple!(literals.len() >= 2);

        // pessimistic lbd until the clause takes part in a conflict
        let num_literals = literals.len() as u32;
        Clause {
            literals,
            is_learned,
            is_deleted: false,
            is_protected_against_deletion: false,
            lbd: num_literals,
            activity: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_learned(&self) -> bool {
        self.is_learned
    }

    pub fn is_protected_against_deletion(&self) -> bool {
        self.is_protected_against_deletion
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn get_literal_slice(&self) -> &[Literal] {
        &self.literals
    }

    pub fn get_lbd(&self) -> u32 {
        self.lbd
    }

    pub fn get_activity(&self) -> f32 {
        sat_assert_advanced!(self.activity == 0.0 || self.activity.is_normal());
        self.activity
    }

    /// Only marks the clause; the allocator decides when the slot is reused.
    pub(crate) fn mark_deleted(&mut self) {
        sat_assert_moderate!(!self.is_deleted);
        self.is_deleted = true;
    }

    pub(crate) fn mark_protection_against_deletion(&mut self) {
        self.is_protected_against_deletion = true;
    }

    pub(crate) fn clear_protection_against_deletion(&mut self) {
        sat_assert_moderate!(self.is_protected_against_deletion);
        self.is_protected_against_deletion = false;
    }

    pub(crate) fn update_lbd(&mut self, new_lbd: u32) {
        sat_assert_moderate!(new_lbd < self.lbd);
        self.lbd = new_lbd;
    }

    pub(crate) fn increase_activity(&mut self, increment: f32) {
        self.activity += increment;
    }

    pub(crate) fn divide_activity(&mut self, division_factor: f32) {
        self.activity /= division_factor;
    }
}

impl std::ops::Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Literal {
        &self.literals[index]
    }
}

impl std::ops::IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Literal {
        &mut self.literals[index]
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({})[learned:{}, deleted:{}]",
            self.literals.iter().join(","),
            self.is_learned,
            self.is_deleted
        )
    }
}
