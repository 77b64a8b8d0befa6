/// Restart intervals following the Luby sequence `1, 1, 2, 1, 1, 2, 4, 1, 1, 2, ...`, multiplied
/// by a base number of conflicts.
///
/// Uses Knuth's "reluctant doubling": the next term doubles the current one unless the current
/// run of doublings has reached the lowest set bit of the run counter, in which case it starts
/// over at one.
#[derive(Debug, Copy, Clone)]
pub(crate) struct LubySequence {
    run: i64,
    term: i64,
    base: i64,
}

impl LubySequence {
    pub(crate) fn new(base: i64) -> LubySequence {
        LubySequence {
            run: 1,
            term: 1,
            base,
        }
    }

    pub(crate) fn next(&mut self) -> i64 {
        let current = self.term;
        let lowest_set_bit = self.run & self.run.wrapping_neg();
        if lowest_set_bit == self.term {
            self.run += 1;
            self.term = 1;
        } else {
            self.term *= 2;
        }
        current * self.base
    }
}

#[cfg(test)]
mod tests {
    use super::LubySequence;

    /// The i-th term (from one) by its recursive definition.
    fn luby(i: usize) -> usize {
        let k = (i + 1).ilog2();
        if (i + 1).is_power_of_two() {
            1 << (k - 1)
        } else {
            luby(i + 1 - (1 << k))
        }
    }

    #[test]
    fn prefix_with_base_one() {
        let mut sequence = LubySequence::new(1);
        let prefix = (0..15).map(|_| sequence.next()).collect::<Vec<_>>();

        assert_eq!(prefix, vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8]);
    }

    #[test]
    fn base_value_scales_every_element() {
        let mut sequence = LubySequence::new(50);
        for i in 1..10_000 {
            assert_eq!(sequence.next(), (luby(i) * 50) as i64);
        }
    }
}
