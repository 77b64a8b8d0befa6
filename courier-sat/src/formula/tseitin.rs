use super::Formula;
use super::VariablePool;
use crate::basic_types::HashMap;
use crate::basic_types::Literal;

/// The clauses produced for one asserted formula.
#[derive(Debug, Default)]
pub(crate) struct EncodedFormula {
    /// Definitions of fresh gate literals. They only fix the value of their gate, so they can be
    /// added permanently regardless of the scope the formula was asserted in.
    pub(crate) definitions: Vec<Vec<Literal>>,
    /// The clauses which make the formula hold.
    pub(crate) assertions: Vec<Vec<Literal>>,
}

/// A gate over already encoded inputs. Equal gates share one literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Gate {
    And(Vec<Literal>),
    Xor(Literal, Literal),
}

/// Tseitin transformation of [`Formula`]s into clauses.
///
/// Every gate is defined by a full equivalence with its inputs, so gate literals can be negated
/// freely. Top-level conjunctions and disjunctions are asserted without introducing gates.
#[derive(Debug, Default)]
pub(crate) struct TseitinEncoder {
    gates: HashMap<Gate, Literal>,
}

impl TseitinEncoder {
    pub(crate) fn encode(
        &mut self,
        formula: &Formula,
        variables: &mut VariablePool,
        true_literal: Literal,
    ) -> EncodedFormula {
        let mut encoded = EncodedFormula::default();
        self.assert_formula(formula, false, variables, true_literal, &mut encoded);
        encoded
    }

    /// Adds the clauses which make `formula` (or its negation if `negated`) hold.
    fn assert_formula(
        &mut self,
        formula: &Formula,
        negated: bool,
        variables: &mut VariablePool,
        true_literal: Literal,
        encoded: &mut EncodedFormula,
    ) {
        match (formula, negated) {
            (Formula::Constant(value), _) => {
                if *value == negated {
                    encoded.assertions.push(vec![]);
                }
            }
            (Formula::Not(inner), _) => {
                self.assert_formula(inner, !negated, variables, true_literal, encoded)
            }
            (Formula::And(conjuncts), false) => {
                for conjunct in conjuncts {
                    self.assert_formula(conjunct, false, variables, true_literal, encoded);
                }
            }
            (Formula::Or(disjuncts), true) => {
                for disjunct in disjuncts {
                    self.assert_formula(disjunct, true, variables, true_literal, encoded);
                }
            }
            (Formula::Or(disjuncts), false) => {
                let clause = disjuncts
                    .iter()
                    .map(|disjunct| {
                        self.encode_literal(disjunct, variables, true_literal, encoded)
                    })
                    .collect();
                encoded.assertions.push(clause);
            }
            (Formula::And(conjuncts), true) => {
                let clause = conjuncts
                    .iter()
                    .map(|conjunct| {
                        !self.encode_literal(conjunct, variables, true_literal, encoded)
                    })
                    .collect();
                encoded.assertions.push(clause);
            }
            (Formula::Implies(antecedent, consequent), false) => {
                let antecedent = self.encode_literal(antecedent, variables, true_literal, encoded);
                let consequent = self.encode_literal(consequent, variables, true_literal, encoded);
                encoded.assertions.push(vec![!antecedent, consequent]);
            }
            (Formula::Implies(antecedent, consequent), true) => {
                self.assert_formula(antecedent, false, variables, true_literal, encoded);
                self.assert_formula(consequent, true, variables, true_literal, encoded);
            }
            (formula, negated) => {
                let literal = self.encode_literal(formula, variables, true_literal, encoded);
                encoded
                    .assertions
                    .push(vec![if negated { !literal } else { literal }]);
            }
        }
    }

    /// Returns a literal which is equivalent to `formula`.
    fn encode_literal(
        &mut self,
        formula: &Formula,
        variables: &mut VariablePool,
        true_literal: Literal,
        encoded: &mut EncodedFormula,
    ) -> Literal {
        match formula {
            Formula::Constant(true) => true_literal,
            Formula::Constant(false) => !true_literal,
            Formula::Literal(literal) => *literal,
            Formula::Not(inner) => !self.encode_literal(inner, variables, true_literal, encoded),
            Formula::And(conjuncts) => {
                let inputs = conjuncts
                    .iter()
                    .map(|conjunct| {
                        self.encode_literal(conjunct, variables, true_literal, encoded)
                    })
                    .collect();
                self.and_gate(inputs, variables, encoded)
            }
            Formula::Or(disjuncts) => {
                // or(x) = not(and(not x)), so both connectives share the and-gates
                let inputs = disjuncts
                    .iter()
                    .map(|disjunct| {
                        !self.encode_literal(disjunct, variables, true_literal, encoded)
                    })
                    .collect();
                !self.and_gate(inputs, variables, encoded)
            }
            Formula::Xor(lhs, rhs) => {
                let lhs = self.encode_literal(lhs, variables, true_literal, encoded);
                let rhs = self.encode_literal(rhs, variables, true_literal, encoded);
                self.xor_gate(lhs, rhs, variables, encoded)
            }
            Formula::Iff(lhs, rhs) => {
                let lhs = self.encode_literal(lhs, variables, true_literal, encoded);
                let rhs = self.encode_literal(rhs, variables, true_literal, encoded);
                !self.xor_gate(lhs, rhs, variables, encoded)
            }
            Formula::Implies(antecedent, consequent) => {
                let antecedent = self.encode_literal(antecedent, variables, true_literal, encoded);
                let consequent = self.encode_literal(consequent, variables, true_literal, encoded);
                !self.and_gate(vec![antecedent, !consequent], variables, encoded)
            }
        }
    }

    fn and_gate(
        &mut self,
        mut inputs: Vec<Literal>,
        variables: &mut VariablePool,
        encoded: &mut EncodedFormula,
    ) -> Literal {
        inputs.sort_unstable();
        inputs.dedup();
        if inputs.len() == 1 {
            return inputs[0];
        }

        let gate = Gate::And(inputs);
        if let Some(literal) = self.gates.get(&gate) {
            return *literal;
        }

        let output = variables.new_literal();
        if let Gate::And(inputs) = &gate {
            for input in inputs.iter() {
                encoded.definitions.push(vec![!output, *input]);
            }
            encoded.definitions.push(
                std::iter::once(output)
                    .chain(inputs.iter().map(|input| !*input))
                    .collect(),
            );
        }
        let _ = self.gates.insert(gate, output);
        output
    }

    fn xor_gate(
        &mut self,
        lhs: Literal,
        rhs: Literal,
        variables: &mut VariablePool,
        encoded: &mut EncodedFormula,
    ) -> Literal {
        let gate = Gate::Xor(lhs.min(rhs), lhs.max(rhs));
        if let Some(literal) = self.gates.get(&gate) {
            return *literal;
        }

        let output = variables.new_literal();
        encoded.definitions.extend([
            vec![!output, lhs, rhs],
            vec![!output, !lhs, !rhs],
            vec![output, !lhs, rhs],
            vec![output, lhs, !rhs],
        ]);
        let _ = self.gates.insert(gate, output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::TseitinEncoder;
    use crate::basic_types::Literal;
    use crate::formula::Formula;
    use crate::formula::VariablePool;

    #[test]
    fn top_level_disjunction_of_literals_becomes_one_clause() {
        let mut variables = VariablePool::default();
        let x = variables.new_literals(3);
        let mut encoder = TseitinEncoder::default();

        let true_literal = variables.true_literal();

        let formula = Formula::or(x.iter().map(|literal| Formula::from(*literal)));
        let encoded = encoder.encode(&formula, &mut variables, true_literal);

        assert!(encoded.definitions.is_empty());
        assert_eq!(encoded.assertions, vec![x.clone()]);
        assert_eq!(variables.num_variables(), 4);
    }

    #[test]
    fn negated_conjunction_is_asserted_as_a_clause() {
        let mut variables = VariablePool::default();
        let x = variables.new_literals(2);
        let mut encoder = TseitinEncoder::default();

        let true_literal = variables.true_literal();

        let formula = !Formula::and([Formula::from(x[0]), Formula::from(x[1])]);
        let encoded = encoder.encode(&formula, &mut variables, true_literal);

        assert_eq!(encoded.assertions, vec![vec![!x[0], !x[1]]]);
    }

    #[test]
    fn equal_gates_are_shared() {
        let mut variables = VariablePool::default();
        let x = variables.new_literals(2);
        let mut encoder = TseitinEncoder::default();
        let true_literal = variables.true_literal();
        let conjunction = || Formula::and([Formula::from(x[1]), Formula::from(x[0])]);

        let first = encoder.encode(
            &Formula::iff(conjunction(), Formula::from(x[0])),
            &mut variables,
            true_literal,
        );
        let num_variables = variables.num_variables();
        let second = encoder.encode(
            &Formula::xor(conjunction(), Formula::from(x[0])),
            &mut variables,
            true_literal,
        );

        assert!(!first.definitions.is_empty());
        assert!(second.definitions.is_empty());
        assert_eq!(variables.num_variables(), num_variables);
        let asserted: Vec<Literal> = first.assertions.concat();
        assert_eq!(vec![!second.assertions.concat()[0]], asserted);
    }

    #[test]
    fn false_constant_produces_the_empty_clause() {
        let mut variables = VariablePool::default();
        let mut encoder = TseitinEncoder::default();
        let true_literal = variables.true_literal();

        let encoded = encoder.encode(&Formula::FALSE, &mut variables, true_literal);

        assert_eq!(encoded.assertions, vec![Vec::<Literal>::new()]);
    }
}
