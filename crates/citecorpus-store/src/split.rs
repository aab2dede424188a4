//! Chronological train/validation/test boundaries

use std::ops::Range;

/// One of the three fixed partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Valid,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Valid, Split::Test];

    pub fn name(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Valid => "valid",
            Self::Test => "test",
        }
    }
}

/// Partition sizes over an ordered sequence of `n` ids.
///
/// `n_train = floor(train_frac * n)`, the remainder is halved with the extra
/// element going to test. The three counts always sum to `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitBounds {
    pub n_train: usize,
    pub n_valid: usize,
    pub n_test: usize,
}

impl SplitBounds {
    /// `train_frac` is assumed already validated to lie in `[0, 1]`.
    pub fn new(n: usize, train_frac: f64) -> Self {
        let n_train = ((train_frac * n as f64).floor() as usize).min(n);
        let n_valid = (n - n_train) / 2;
        let n_test = n - n_train - n_valid;
        Self {
            n_train,
            n_valid,
            n_test,
        }
    }

    pub fn total(&self) -> usize {
        self.n_train + self.n_valid + self.n_test
    }

    pub fn range(&self, split: Split) -> Range<usize> {
        let valid_start = self.n_train;
        let test_start = self.n_train + self.n_valid;
        match split {
            Split::Train => 0..valid_start,
            Split::Valid => valid_start..test_start,
            Split::Test => test_start..self.total(),
        }
    }

    /// Partition that position `pos` falls into.
    pub fn split_of(&self, pos: usize) -> Option<Split> {
        Split::ALL
            .into_iter()
            .find(|&s| self.range(s).contains(&pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_at_point_eight() {
        let b = SplitBounds::new(100, 0.8);
        assert_eq!((b.n_train, b.n_valid, b.n_test), (80, 10, 10));
    }

    #[test]
    fn odd_remainder_goes_to_test() {
        let b = SplitBounds::new(10, 0.75);
        assert_eq!((b.n_train, b.n_valid, b.n_test), (7, 1, 2));
    }

    #[test]
    fn empty_corpus() {
        for frac in [0.0, 0.5, 0.8, 1.0] {
            let b = SplitBounds::new(0, frac);
            assert_eq!(b.total(), 0);
            assert!(b.range(Split::Train).is_empty());
            assert!(b.range(Split::Valid).is_empty());
            assert!(b.range(Split::Test).is_empty());
        }
    }

    #[test]
    fn extremes() {
        let all_train = SplitBounds::new(7, 1.0);
        assert_eq!((all_train.n_train, all_train.n_valid, all_train.n_test), (7, 0, 0));
        let none_train = SplitBounds::new(7, 0.0);
        assert_eq!((none_train.n_train, none_train.n_valid, none_train.n_test), (0, 3, 4));
    }

    #[test]
    fn counts_always_sum_and_ranges_tile() {
        let fracs = [0.0, 0.1, 0.33, 0.5, 0.8, 0.9, 0.999, 1.0];
        for n in 0..300 {
            for &frac in &fracs {
                let b = SplitBounds::new(n, frac);
                assert_eq!(b.total(), n, "n={n} frac={frac}");
                assert_eq!(b.range(Split::Train).start, 0);
                assert_eq!(b.range(Split::Train).end, b.range(Split::Valid).start);
                assert_eq!(b.range(Split::Valid).end, b.range(Split::Test).start);
                assert_eq!(b.range(Split::Test).end, n);
            }
        }
    }

    #[test]
    fn split_of_positions() {
        let b = SplitBounds::new(10, 0.8);
        assert_eq!(b.split_of(0), Some(Split::Train));
        assert_eq!(b.split_of(7), Some(Split::Train));
        assert_eq!(b.split_of(8), Some(Split::Valid));
        assert_eq!(b.split_of(9), Some(Split::Test));
        assert_eq!(b.split_of(10), None);
    }
}
