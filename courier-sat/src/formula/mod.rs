//! Boolean formulas over [`Literal`]s, the language in which the encoders describe constraints.
//!
//! Formulas are built with the smart constructors ([`Formula::and`], [`Formula::or`], ...), which
//! fold constants away, so a formula only contains [`Formula::Constant`] at its root.

mod tseitin;
mod variable_pool;

pub(crate) use tseitin::*;
pub use variable_pool::*;

use crate::basic_types::Literal;
use crate::basic_types::Solution;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Formula {
    Constant(bool),
    Literal(Literal),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Xor(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub const TRUE: Formula = Formula::Constant(true);
    pub const FALSE: Formula = Formula::Constant(false);

    /// The conjunction of the given formulas; nested conjunctions are flattened.
    pub fn and(formulas: impl IntoIterator<Item = Formula>) -> Formula {
        let mut conjuncts = vec![];
        for formula in formulas {
            match formula {
                Formula::Constant(true) => {}
                Formula::Constant(false) => return Formula::FALSE,
                Formula::And(nested) => conjuncts.extend(nested),
                formula => conjuncts.push(formula),
            }
        }

        match conjuncts.len() {
            0 => Formula::TRUE,
            1 => conjuncts.remove(0),
            _ => Formula::And(conjuncts),
        }
    }

    /// The disjunction of the given formulas; nested disjunctions are flattened.
    pub fn or(formulas: impl IntoIterator<Item = Formula>) -> Formula {
        let mut disjuncts = vec![];
        for formula in formulas {
            match formula {
                Formula::Constant(false) => {}
                Formula::Constant(true) => return Formula::TRUE,
                Formula::Or(nested) => disjuncts.extend(nested),
                formula => disjuncts.push(formula),
            }
        }

        match disjuncts.len() {
            0 => Formula::FALSE,
            1 => disjuncts.remove(0),
            _ => Formula::Or(disjuncts),
        }
    }

    pub fn xor(lhs: Formula, rhs: Formula) -> Formula {
        match (lhs, rhs) {
            (Formula::Constant(value), other) | (other, Formula::Constant(value)) => {
                if value {
                    !other
                } else {
                    other
                }
            }
            (lhs, rhs) => Formula::Xor(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn iff(lhs: Formula, rhs: Formula) -> Formula {
        match (lhs, rhs) {
            (Formula::Constant(value), other) | (other, Formula::Constant(value)) => {
                if value {
                    other
                } else {
                    !other
                }
            }
            (lhs, rhs) => Formula::Iff(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn implies(antecedent: Formula, consequent: Formula) -> Formula {
        match (antecedent, consequent) {
            (Formula::Constant(false), _) | (_, Formula::Constant(true)) => Formula::TRUE,
            (Formula::Constant(true), consequent) => consequent,
            (antecedent, Formula::Constant(false)) => !antecedent,
            (antecedent, consequent) => {
                Formula::Implies(Box::new(antecedent), Box::new(consequent))
            }
        }
    }

    /// The truth value of the formula under the given solution; literals which are absent from
    /// the solution are false.
    pub fn evaluate(&self, solution: &Solution) -> bool {
        match self {
            Formula::Constant(value) => *value,
            Formula::Literal(literal) => solution.get_literal_value(*literal),
            Formula::Not(formula) => !formula.evaluate(solution),
            Formula::And(formulas) => formulas.iter().all(|formula| formula.evaluate(solution)),
            Formula::Or(formulas) => formulas.iter().any(|formula| formula.evaluate(solution)),
            Formula::Xor(lhs, rhs) => lhs.evaluate(solution) != rhs.evaluate(solution),
            Formula::Iff(lhs, rhs) => lhs.evaluate(solution) == rhs.evaluate(solution),
            Formula::Implies(antecedent, consequent) => {
                !antecedent.evaluate(solution) || consequent.evaluate(solution)
            }
        }
    }
}

impl std::ops::Not for Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        match self {
            Formula::Constant(value) => Formula::Constant(!value),
            Formula::Literal(literal) => Formula::Literal(!literal),
            Formula::Not(formula) => *formula,
            formula => Formula::Not(Box::new(formula)),
        }
    }
}

impl From<Literal> for Formula {
    fn from(literal: Literal) -> Formula {
        Formula::Literal(literal)
    }
}

impl From<bool> for Formula {
    fn from(value: bool) -> Formula {
        Formula::Constant(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Formula;
    use crate::basic_types::Literal;
    use crate::basic_types::PropositionalVariable;

    fn literal(index: u32) -> Formula {
        Literal::new(PropositionalVariable::new(index), true).into()
    }

    #[test]
    fn constants_are_folded_away() {
        assert_eq!(Formula::and([Formula::TRUE, literal(1)]), literal(1));
        assert_eq!(Formula::and([literal(1), Formula::FALSE]), Formula::FALSE);
        assert_eq!(Formula::or([Formula::FALSE, Formula::FALSE]), Formula::FALSE);
        assert_eq!(Formula::or(Vec::new()), Formula::FALSE);
        assert_eq!(Formula::and(Vec::new()), Formula::TRUE);
        assert_eq!(Formula::xor(Formula::TRUE, literal(2)), !literal(2));
        assert_eq!(Formula::iff(literal(2), Formula::FALSE), !literal(2));
        assert_eq!(Formula::implies(literal(1), Formula::FALSE), !literal(1));
        assert_eq!(Formula::implies(Formula::FALSE, literal(1)), Formula::TRUE);
    }

    #[test]
    fn nested_connectives_are_flattened() {
        let formula = Formula::and([
            Formula::and([literal(1), literal(2)]),
            Formula::or([literal(3), Formula::or([literal(4), literal(5)])]),
        ]);

        assert_eq!(
            formula,
            Formula::And(vec![
                literal(1),
                literal(2),
                Formula::Or(vec![literal(3), literal(4), literal(5)])
            ])
        );
    }

    #[test]
    fn double_negation_cancels() {
        let formula = Formula::or([literal(1), literal(2)]);

        assert_eq!(!!formula.clone(), formula);
        let negated = !Literal::new(PropositionalVariable::new(3), true);
        assert_eq!(!literal(3), Formula::Literal(negated));
    }
}
