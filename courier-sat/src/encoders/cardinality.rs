//! Builders for cardinality constraints over literals.
//!
//! The builders are pure: they return a [`Formula`] which the caller asserts. Most of them
//! introduce auxiliary propositions which are only constrained in one direction, so the returned
//! formulas must be asserted (or used as the consequent of an implication), never negated.

use itertools::Itertools;

use crate::basic_types::Literal;
use crate::formula::Formula;
use crate::formula::VariablePool;

/// Below this many inputs [`at_most_one`] uses the pairwise encoding.
const PAIRWISE_AT_MOST_ONE_THRESHOLD: usize = 5;

pub fn at_least_one(literals: &[Literal]) -> Formula {
    Formula::or(literals.iter().map(|&literal| literal.into()))
}

/// At most one of `literals` is true.
///
/// Uses the pairwise encoding for fewer than five inputs, and the binary encoding with
/// `ceil(log2(n))` auxiliary propositions otherwise: every input which is true forces the
/// auxiliary propositions to spell out its index.
pub fn at_most_one(literals: &[Literal], variables: &mut VariablePool) -> Formula {
    if literals.len() < PAIRWISE_AT_MOST_ONE_THRESHOLD {
        return Formula::and(
            literals
                .iter()
                .tuple_combinations()
                .map(|(&lhs, &rhs)| Formula::or([(!lhs).into(), (!rhs).into()])),
        );
    }

    let num_index_bits = literals.len().next_power_of_two().trailing_zeros() as usize;
    let index_bits = variables.new_literals(num_index_bits);

    Formula::and(literals.iter().enumerate().flat_map(|(index, &literal)| {
        index_bits
            .iter()
            .enumerate()
            .map(move |(position, &index_bit)| {
                let is_set = (index >> position) & 1 == 1;
                let index_bit = if is_set { index_bit } else { !index_bit };
                Formula::or([(!literal).into(), index_bit.into()])
            })
    }))
}

pub fn exactly_one(literals: &[Literal], variables: &mut VariablePool) -> Formula {
    Formula::and([at_least_one(literals), at_most_one(literals, variables)])
}

/// At most `k` of `literals` are true, through the sequential counter.
///
/// The auxiliary proposition `s[i][j]` holds if at least `j + 1` of the first `i + 1` inputs are
/// true; an input which would push the count of its prefix beyond `k` is forbidden.
pub fn at_most_k(literals: &[Literal], k: usize, variables: &mut VariablePool) -> Formula {
    let n = literals.len();
    if k >= n {
        return Formula::TRUE;
    }
    if k == 0 {
        return Formula::and(literals.iter().map(|&literal| (!literal).into()));
    }

    let counters = (0..n - 1)
        .map(|_| variables.new_literals(k))
        .collect::<Vec<_>>();
    let implies =
        |lhs: Literal, rhs: Literal| Formula::or([(!lhs).into(), rhs.into()]);

    let mut clauses = vec![implies(literals[0], counters[0][0])];
    clauses.extend(counters[0][1..].iter().map(|&counter| (!counter).into()));

    for (i, &input) in literals.iter().enumerate().take(n - 1).skip(1) {
        clauses.push(implies(input, counters[i][0]));
        for j in 0..k {
            clauses.push(implies(counters[i - 1][j], counters[i][j]));
        }
        for j in 1..k {
            clauses.push(Formula::or([
                (!input).into(),
                (!counters[i - 1][j - 1]).into(),
                counters[i][j].into(),
            ]));
        }
        clauses.push(implies(input, !counters[i - 1][k - 1]));
    }
    clauses.push(implies(literals[n - 1], !counters[n - 2][k - 1]));

    Formula::and(clauses)
}

/// At least `k` of `literals` are true, as at most `n - k` of the negated inputs being true.
pub fn at_least_k(literals: &[Literal], k: usize, variables: &mut VariablePool) -> Formula {
    let n = literals.len();
    if k == 0 {
        return Formula::TRUE;
    }
    if k > n {
        return Formula::FALSE;
    }
    if k == 1 {
        return at_least_one(literals);
    }

    let negated = literals.iter().map(|&literal| !literal).collect::<Vec<_>>();
    at_most_k(&negated, n - k, variables)
}

pub fn exactly_k(literals: &[Literal], k: usize, variables: &mut VariablePool) -> Formula {
    Formula::and([
        at_least_k(literals, k, variables),
        at_most_k(literals, k, variables),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CdclContext;
    use crate::context::CheckResult;
    use crate::context::SolverContext;

    /// Checks that `build(inputs)` is satisfiable exactly under the assignments of the inputs
    /// for which `accepts(number of true inputs)` holds.
    fn assert_exact(
        n: usize,
        build: impl Fn(&[Literal], &mut VariablePool) -> Formula,
        accepts: impl Fn(usize) -> bool,
    ) {
        let mut context = CdclContext::default();
        let inputs = context.variables().new_literals(n);
        let formula = build(&inputs, context.variables());
        context.assert_formula(formula);

        for assignment in 0..1_usize << n {
            context.push();
            for (position, &input) in inputs.iter().enumerate() {
                let fixed = if (assignment >> position) & 1 == 1 {
                    input
                } else {
                    !input
                };
                context.assert_formula(fixed.into());
            }

            let expected = if accepts(assignment.count_ones() as usize) {
                CheckResult::Sat
            } else {
                CheckResult::Unsat
            };
            assert_eq!(
                context.check(),
                expected,
                "n = {n}, assignment = {assignment:b}"
            );
            context.pop().expect("a checkpoint was pushed");
        }
    }

    #[test]
    fn exactly_k_accepts_only_assignments_with_k_true_inputs() {
        for n in [1, 3, 5, 8] {
            for k in 0..=n {
                assert_exact(n, |inputs, variables| exactly_k(inputs, k, variables), |count| {
                    count == k
                });
            }
        }
    }

    #[test]
    fn at_most_one_is_exact_for_both_encodings() {
        for n in [2, 4, 5, 7] {
            assert_exact(n, at_most_one, |count| count <= 1);
        }
    }

    #[test]
    fn exactly_one_is_exact_for_the_binary_encoding() {
        assert_exact(6, exactly_one, |count| count == 1);
    }

    #[test]
    fn at_most_k_is_exact() {
        for k in 0..=6 {
            assert_exact(6, |inputs, variables| at_most_k(inputs, k, variables), |count| {
                count <= k
            });
        }
    }

    #[test]
    fn at_least_k_beyond_the_number_of_inputs_is_false() {
        let mut variables = VariablePool::default();
        let inputs = variables.new_literals(3);

        assert_eq!(at_least_k(&inputs, 4, &mut variables), Formula::FALSE);
        assert_eq!(at_least_k(&inputs, 0, &mut variables), Formula::TRUE);
        assert_eq!(at_most_k(&inputs, 3, &mut variables), Formula::TRUE);
        assert_eq!(at_least_one(&[]), Formula::FALSE);
    }

    #[test]
    fn binary_at_most_one_uses_logarithmically_many_propositions() {
        let mut variables = VariablePool::default();
        let inputs = variables.new_literals(9);
        let before = variables.num_variables();

        let _ = at_most_one(&inputs, &mut variables);

        assert_eq!(variables.num_variables() - before, 4);
    }
}
