use super::PropositionalVariable;
use crate::asserts::sat_assert_moderate;
use crate::containers::StorageKey;

/// A [`PropositionalVariable`] together with a polarity. The code of a literal is
/// `2 * variable + polarity`, which makes both polarities of a variable neighbours when stored in
/// a [`crate::containers::KeyedVec`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    code: u32,
}

impl Literal {
    pub fn new(propositional_variable: PropositionalVariable, is_positive: bool) -> Literal {
        Literal {
            code: propositional_variable.get_index() * 2 + (is_positive as u32),
        }
    }

    pub fn is_positive(&self) -> bool {
        (self.code & 1) == 1
    }

    pub fn is_negative(&self) -> bool {
        (self.code & 1) == 0
    }

    pub fn get_propositional_variable(&self) -> PropositionalVariable {
        PropositionalVariable::new(self.code / 2)
    }

    pub fn to_u32(self) -> u32 {
        self.code
    }

    pub fn u32_to_literal(literal_code: u32) -> Literal {
        let literal = Literal { code: literal_code };
        sat_assert_moderate!(
            Literal::new(literal.get_propositional_variable(), literal.is_positive()) == literal
        );
        literal
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_negative() {
            write!(f, "~{}", self.get_propositional_variable())
        } else {
            write!(f, "{}", self.get_propositional_variable())
        }
    }
}

impl StorageKey for Literal {
    fn index(&self) -> usize {
        self.code as usize
    }

    fn create_from_index(index: usize) -> Self {
        Literal::u32_to_literal(index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::Literal;
    use crate::basic_types::PropositionalVariable;

    #[test]
    fn negation_flips_only_the_polarity() {
        let variable = PropositionalVariable::new(7);
        let literal = Literal::new(variable, true);

        assert!(literal.is_positive());
        assert!((!literal).is_negative());
        assert_eq!((!literal).get_propositional_variable(), variable);
        assert_eq!(!!literal, literal);
    }

    #[test]
    fn polarities_of_a_variable_are_neighbours() {
        let variable = PropositionalVariable::new(3);
        let negative = Literal::new(variable, false);
        let positive = Literal::new(variable, true);

        assert_eq!(negative.to_u32(), 6);
        assert_eq!(positive.to_u32(), 7);
        assert_eq!(Literal::u32_to_literal(7), positive);
    }
}
