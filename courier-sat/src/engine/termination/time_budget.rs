use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// Stops the engine once a wall-clock deadline has passed.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    /// `None` if the deadline cannot be represented, which never triggers.
    deadline: Option<Instant>,
}

impl TimeBudget {
    /// The deadline lies `budget` from now. A zero budget stops at the first poll.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            deadline: Instant::now().checked_add(budget),
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}
