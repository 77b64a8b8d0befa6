use crate::asserts::sat_assert_moderate;
use crate::asserts::sat_assert_ne_simple;
use crate::asserts::sat_assert_simple;
use crate::basic_types::Literal;
use crate::basic_types::PropositionalVariable;
use crate::containers::KeyedVec;

/// The truth values of the propositions, together with the trail which records the order in
/// which they were assigned.
#[derive(Debug, Default)]
pub(crate) struct AssignmentsPropositional {
    assignment_info: KeyedVec<PropositionalVariable, PropositionalAssignmentInfo>,
    current_decision_level: u32,
    pub(crate) trail: Vec<Literal>,
    /// `[i]` is the position on the trail where decision level `i + 1` starts. The current
    /// decision level does not have an entry until a new level is opened.
    pub(crate) trail_delimiter: Vec<u32>,
}

impl AssignmentsPropositional {
    pub(crate) fn increase_decision_level(&mut self) {
        self.current_decision_level += 1;
        self.trail_delimiter.push(self.trail.len() as u32);
    }

    pub(crate) fn get_decision_level(&self) -> u32 {
        self.current_decision_level
    }

    pub(crate) fn grow(&mut self) {
        self.assignment_info
            .push(PropositionalAssignmentInfo::Unassigned);
    }

    pub(crate) fn num_propositional_variables(&self) -> u32 {
        self.assignment_info.len() as u32
    }

    pub(crate) fn num_assigned_propositional_variables(&self) -> u32 {
        self.trail.len() as u32
    }

    pub(crate) fn is_at_the_root_level(&self) -> bool {
        self.current_decision_level == 0
    }

    /// Removes the last literal from the trail and unassigns its proposition.
    pub(crate) fn pop_trail(&mut self) -> Option<Literal> {
        let last_literal = self.trail.pop()?;
        self.undo_assignment(last_literal.get_propositional_variable());
        Some(last_literal)
    }

    pub(crate) fn is_variable_assigned_true(&self, variable: PropositionalVariable) -> bool {
        matches!(
            self.assignment_info[variable],
            PropositionalAssignmentInfo::Assigned {
                truth_value: true,
                ..
            }
        )
    }

    pub(crate) fn is_variable_assigned(&self, variable: PropositionalVariable) -> bool {
        self.assignment_info[variable] != PropositionalAssignmentInfo::Unassigned
    }

    pub(crate) fn is_literal_assigned_true(&self, literal: Literal) -> bool {
        match self.assignment_info[literal.get_propositional_variable()] {
            PropositionalAssignmentInfo::Assigned { truth_value, .. } => {
                truth_value == literal.is_positive()
            }
            PropositionalAssignmentInfo::Unassigned => false,
        }
    }

    pub(crate) fn is_literal_assigned_false(&self, literal: Literal) -> bool {
        self.is_literal_assigned_true(!literal)
    }

    pub(crate) fn is_literal_assigned(&self, literal: Literal) -> bool {
        self.is_variable_assigned(literal.get_propositional_variable())
    }

    pub(crate) fn is_literal_unassigned(&self, literal: Literal) -> bool {
        !self.is_literal_assigned(literal)
    }

    pub(crate) fn is_literal_root_assignment(&self, literal: Literal) -> bool {
        self.is_literal_assigned(literal) && self.get_literal_assignment_level(literal) == 0
    }

    pub(crate) fn is_literal_propagated(&self, literal: Literal) -> bool {
        match self.assignment_info[literal.get_propositional_variable()] {
            PropositionalAssignmentInfo::Assigned { reason_code, .. } => reason_code != 0,
            PropositionalAssignmentInfo::Unassigned => false,
        }
    }

    pub(crate) fn get_literal_assignment_level(&self, literal: Literal) -> u32 {
        match self.assignment_info[literal.get_propositional_variable()] {
            PropositionalAssignmentInfo::Assigned { decision_level, .. } => decision_level,
            PropositionalAssignmentInfo::Unassigned => {
                panic!("Unassigned propositions do not have an assignment level")
            }
        }
    }

    /// The reason code is zero for decisions, otherwise it is the id of the propagating clause.
    pub(crate) fn get_literal_reason_code(&self, literal: Literal) -> u32 {
        match self.assignment_info[literal.get_propositional_variable()] {
            PropositionalAssignmentInfo::Assigned { reason_code, .. } => reason_code,
            PropositionalAssignmentInfo::Unassigned => {
                panic!("Unassigned propositions do not have a reason code")
            }
        }
    }

    pub(crate) fn enqueue_decision_literal(&mut self, decision_literal: Literal) {
        sat_assert_simple!(self.is_literal_unassigned(decision_literal));

        self.make_assignment(decision_literal, 0);
    }

    pub(crate) fn enqueue_propagated_literal(
        &mut self,
        propagated_literal: Literal,
        reason_code: u32,
    ) {
        sat_assert_simple!(self.is_literal_unassigned(propagated_literal));
        sat_assert_ne_simple!(reason_code, 0);

        self.make_assignment(propagated_literal, reason_code);
    }

    /// Moves the decision level back to `new_decision_level`. The trail must already have been
    /// popped up to the start of the level above it.
    pub(crate) fn synchronise(&mut self, new_decision_level: u32) {
        sat_assert_simple!(new_decision_level < self.current_decision_level);
        sat_assert_simple!(
            self.trail.len() == self.trail_delimiter[new_decision_level as usize] as usize,
            "The trail has to be popped before the decision level is synchronised."
        );

        self.current_decision_level = new_decision_level;
        self.trail_delimiter.truncate(new_decision_level as usize);
    }

    fn make_assignment(&mut self, true_literal: Literal, reason_code: u32) {
        self.assignment_info[true_literal.get_propositional_variable()] =
            PropositionalAssignmentInfo::Assigned {
                truth_value: true_literal.is_positive(),
                decision_level: self.current_decision_level,
                reason_code,
            };

        self.trail.push(true_literal);
    }

    fn undo_assignment(&mut self, variable: PropositionalVariable) {
        sat_assert_moderate!(self.is_variable_assigned(variable));

        self.assignment_info[variable] = PropositionalAssignmentInfo::Unassigned;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PropositionalAssignmentInfo {
    Assigned {
        truth_value: bool,
        decision_level: u32,
        reason_code: u32,
    },
    Unassigned,
}

#[cfg(test)]
mod tests {
    use super::AssignmentsPropositional;
    use crate::basic_types::Literal;
    use crate::basic_types::PropositionalVariable;

    fn literal(index: u32) -> Literal {
        Literal::new(PropositionalVariable::new(index), true)
    }

    #[test]
    fn assignments_are_undone_when_the_trail_is_popped() {
        let mut assignments = AssignmentsPropositional::default();
        assignments.grow();
        assignments.grow();

        assignments.enqueue_decision_literal(literal(0));
        assignments.increase_decision_level();
        assignments.enqueue_propagated_literal(!literal(1), 3);

        assert!(assignments.is_literal_root_assignment(literal(0)));
        assert!(assignments.is_literal_assigned_false(literal(1)));
        assert!(assignments.is_literal_propagated(!literal(1)));
        assert_eq!(assignments.get_literal_assignment_level(literal(1)), 1);
        assert_eq!(assignments.get_literal_reason_code(literal(1)), 3);

        assert_eq!(assignments.pop_trail(), Some(!literal(1)));
        assignments.synchronise(0);

        assert!(assignments.is_literal_unassigned(literal(1)));
        assert!(assignments.is_literal_assigned_true(literal(0)));
        assert!(assignments.is_at_the_root_level());
    }
}
