use std::time::Duration;
use std::time::Instant;

/// Measures the time of the whole run, from reading the instance to reporting the routes. The
/// optimisation loop derives the timeout of every check from it.
#[derive(Debug, Copy, Clone)]
pub struct Stopwatch {
    started_at: Instant,
}

impl Stopwatch {
    pub fn starting_now() -> Stopwatch {
        Stopwatch {
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// The part of `budget` which has not been used up yet, saturating at zero.
    pub fn remaining(&self, budget: Duration) -> Duration {
        budget.saturating_sub(self.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Stopwatch;

    #[test]
    fn remaining_budget_saturates_at_zero() {
        let stopwatch = Stopwatch::starting_now();

        assert_eq!(stopwatch.remaining(Duration::ZERO), Duration::ZERO);
        assert!(stopwatch.remaining(Duration::from_secs(3600)) > Duration::from_secs(3500));
    }
}
