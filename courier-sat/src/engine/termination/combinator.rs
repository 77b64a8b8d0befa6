use super::TerminationCondition;

/// Stops as soon as either of its two conditions does, e.g. a [`TimeBudget`] next to an
/// interrupt.
///
/// [`TimeBudget`]: super::TimeBudget
#[derive(Clone, Copy, Debug)]
pub struct Combinator<First, Second> {
    first: First,
    second: Second,
}

impl<First, Second> Combinator<First, Second> {
    pub fn new(first: First, second: Second) -> Self {
        Combinator { first, second }
    }
}

impl<First, Second> TerminationCondition for Combinator<First, Second>
where
    First: TerminationCondition,
    Second: TerminationCondition,
{
    fn should_stop(&mut self) -> bool {
        // every condition observes every poll
        let first = self.first.should_stop();
        let second = self.second.should_stop();
        first || second
    }

    fn decision_has_been_made(&mut self) {
        self.first.decision_has_been_made();
        self.second.decision_has_been_made();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Combinator;
    use crate::engine::termination::Indefinite;
    use crate::engine::termination::TerminationCondition;
    use crate::engine::termination::TimeBudget;

    #[test]
    fn stops_when_either_condition_stops() {
        let mut never = Combinator::new(Indefinite, None::<TimeBudget>);
        let mut expired = Combinator::new(Indefinite, TimeBudget::starting_now(Duration::ZERO));

        assert!(!never.should_stop());
        assert!(expired.should_stop());
    }
}
