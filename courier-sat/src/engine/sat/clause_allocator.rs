use crate::asserts::sat_assert_advanced;
use crate::asserts::sat_assert_moderate;
use crate::asserts::sat_assert_ne_simple;
use crate::asserts::sat_assert_simple;
use crate::basic_types::Clause;
use crate::basic_types::ClauseReference;
use crate::basic_types::Literal;

/// Owns every clause of the engine. Clause reference id zero is never handed out, since a reason
/// code of zero marks a decision.
#[derive(Debug, Default)]
pub(crate) struct ClauseAllocator {
    allocated_clauses: Vec<Clause>,
    deleted_clause_ids: Vec<ClauseReference>,
}

impl ClauseAllocator {
    pub(crate) fn create_clause(
        &mut self,
        literals: Vec<Literal>,
        is_learned: bool,
    ) -> ClauseReference {
        sat_assert_ne_simple!(literals.len(), 0);

        match self.deleted_clause_ids.pop() {
            Some(clause_reference) => {
                self.allocated_clauses[clause_reference.id as usize - 1] =
                    Clause::new(literals, is_learned);
                clause_reference
            }
            None => {
                self.allocated_clauses
                    .push(Clause::new(literals, is_learned));
                let clause_reference = ClauseReference {
                    id: self.allocated_clauses.len() as u32,
                };
                sat_assert_simple!(
                    clause_reference.id < u32::MAX,
                    "Clause allocation reached its limit."
                );
                clause_reference
            }
        }
    }

    pub(crate) fn get_clause(&self, clause_reference: ClauseReference) -> &Clause {
        sat_assert_moderate!(clause_reference.id != 0);
        &self.allocated_clauses[clause_reference.id as usize - 1]
    }

    pub(crate) fn get_mutable_clause(&mut self, clause_reference: ClauseReference) -> &mut Clause {
        sat_assert_moderate!(clause_reference.id != 0);
        &mut self.allocated_clauses[clause_reference.id as usize - 1]
    }

    /// Marks the clause as deleted; its id is handed out again by the next allocation.
    pub(crate) fn delete_clause(&mut self, clause_reference: ClauseReference) {
        sat_assert_moderate!(
            !self.get_clause(clause_reference).is_deleted(),
            "Cannot delete an already deleted clause."
        );
        sat_assert_advanced!(
            !self.deleted_clause_ids.contains(&clause_reference),
            "The id of the clause is already available for reuse."
        );

        self.get_mutable_clause(clause_reference).mark_deleted();
        self.deleted_clause_ids.push(clause_reference);
    }

    pub(crate) fn num_live_clauses(&self) -> usize {
        self.allocated_clauses.len() - self.deleted_clause_ids.len()
    }
}

impl std::ops::Index<ClauseReference> for ClauseAllocator {
    type Output = Clause;

    fn index(&self, clause_reference: ClauseReference) -> &Clause {
        self.get_clause(clause_reference)
    }
}

impl std::ops::IndexMut<ClauseReference> for ClauseAllocator {
    fn index_mut(&mut self, clause_reference: ClauseReference) -> &mut Clause {
        self.get_mutable_clause(clause_reference)
    }
}

#[cfg(test)]
mod tests {
    use super::ClauseAllocator;
    use crate::basic_types::Literal;
    use crate::basic_types::PropositionalVariable;

    fn literals(indices: &[u32]) -> Vec<Literal> {
        indices
            .iter()
            .map(|index| Literal::new(PropositionalVariable::new(*index), true))
            .collect()
    }

    #[test]
    fn ids_start_at_one() {
        let mut allocator = ClauseAllocator::default();

        let first = allocator.create_clause(literals(&[1, 2]), false);
        let second = allocator.create_clause(literals(&[2, 3]), true);

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(allocator[second].is_learned());
    }

    #[test]
    fn deleted_ids_are_reused_for_the_right_slot() {
        let mut allocator = ClauseAllocator::default();
        let first = allocator.create_clause(literals(&[1, 2]), false);
        let second = allocator.create_clause(literals(&[3, 4]), true);

        allocator.delete_clause(first);
        let reused = allocator.create_clause(literals(&[5, 6, 7]), true);

        assert_eq!(reused, first);
        assert_eq!(allocator[reused].len(), 3);
        assert!(!allocator[reused].is_deleted());
        assert_eq!(allocator[second].get_literal_slice(), literals(&[3, 4]));
        assert_eq!(allocator.num_live_clauses(), 2);
    }
}
