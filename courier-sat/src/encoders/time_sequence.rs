use super::cardinality::at_most_one;
use crate::basic_types::Literal;
use crate::basic_types::Solution;
use crate::formula::Formula;
use crate::formula::VariablePool;

/// A one-hot encoding of a step in `0..=length`.
///
/// Position `i` being true encodes step `i + 1`; no position being true encodes step zero, which
/// is tracked by a dedicated literal. The sequence does not wrap around: the successor of the
/// last step does not exist.
#[derive(Clone, Debug)]
pub struct TimeSequence {
    positions: Vec<Literal>,
    is_zero: Literal,
}

impl TimeSequence {
    pub fn new(length: usize, variables: &mut VariablePool) -> TimeSequence {
        TimeSequence {
            positions: variables.new_literals(length),
            is_zero: variables.new_literal(),
        }
    }

    /// Has to be asserted once for every sequence: at most one position is true and the zero
    /// literal holds exactly when none is.
    pub fn definition(&self, variables: &mut VariablePool) -> Formula {
        let any_position = Formula::or(self.positions.iter().map(|&position| position.into()));
        Formula::and([
            Formula::iff(self.is_zero.into(), !any_position),
            at_most_one(&self.positions, variables),
        ])
    }

    pub fn is_zero(&self) -> Formula {
        self.is_zero.into()
    }

    /// Holds if this sequence encodes the step directly after the one of `previous`. Relies on the
    /// definition of this sequence: if `previous` is at its last step, this sequence would have
    /// to be zero.
    ///
    /// Only relates literals of both sequences, so the formula may be negated.
    pub fn next(&self, previous: &TimeSequence) -> Formula {
        let shifted = self
            .positions
            .iter()
            .skip(1)
            .zip(previous.positions.iter())
            .map(|(&position, &previous_position)| {
                Formula::iff(position.into(), previous_position.into())
            });

        let first_step = match self.positions.first() {
            Some(&first) => Formula::iff(first.into(), previous.is_zero()),
            None => Formula::FALSE,
        };

        Formula::and([!self.is_zero(), first_step].into_iter().chain(shifted))
    }

    /// The encoded step; propositions absent from `solution` are false.
    pub fn to_value(&self, solution: &Solution) -> usize {
        self.positions
            .iter()
            .position(|&position| solution.get_literal_value(position))
            .map_or(0, |index| index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::TimeSequence;
    use crate::context::CdclContext;
    use crate::context::CheckResult;
    use crate::context::SolverContext;

    fn sequences(context: &mut CdclContext, count: usize, length: usize) -> Vec<TimeSequence> {
        (0..count)
            .map(|_| {
                let sequence = TimeSequence::new(length, context.variables());
                let definition = sequence.definition(context.variables());
                context.assert_formula(definition);
                sequence
            })
            .collect()
    }

    #[test]
    fn chain_from_zero_counts_up() {
        let mut context = CdclContext::default();
        let chain = sequences(&mut context, 4, 5);

        context.assert_formula(chain[0].is_zero());
        for window in chain.windows(2) {
            context.assert_formula(window[1].next(&window[0]));
        }
        assert_eq!(context.check(), CheckResult::Sat);
        let solution = context.model().expect("check returned sat");

        let steps = chain
            .iter()
            .map(|sequence| sequence.to_value(solution))
            .collect::<Vec<_>>();
        assert_eq!(steps, vec![0, 1, 2, 3]);
    }

    #[test]
    fn cycles_are_impossible() {
        let mut context = CdclContext::default();
        let cycle = sequences(&mut context, 3, 5);

        for index in 0..cycle.len() {
            let next = &cycle[(index + 1) % cycle.len()];
            context.assert_formula(next.next(&cycle[index]));
        }

        assert_eq!(context.check(), CheckResult::Unsat);
    }

    #[test]
    fn the_last_step_has_no_successor() {
        let mut context = CdclContext::default();
        let chain = sequences(&mut context, 4, 2);

        context.assert_formula(chain[0].is_zero());
        for window in chain.windows(2) {
            context.assert_formula(window[1].next(&window[0]));
        }

        assert_eq!(context.check(), CheckResult::Unsat);
    }
}
