use crate::error::Result;

use super::{Selector, ucb_select};

/// UCB over the mean of each arm's best `k` scores.
///
/// Arms with fewer than `k` scores use all of them. Favors tunables whose
/// best results are strong, even when their average is dragged down by
/// poor configurations.
#[derive(Clone, Copy, Debug)]
pub struct BestKReward {
    k: usize,
}

impl BestKReward {
    /// Creates a selector that averages the best `k` scores (at least 1).
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self { k: k.max(1) }
    }

    /// The number of scores averaged per arm.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }
}

impl Default for BestKReward {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Selector for BestKReward {
    fn select<'a>(&self, arms: &[(&'a str, &[f64])]) -> Result<&'a str> {
        ucb_select(arms, |history| {
            let mut sorted = history.to_vec();
            sorted.sort_by(|a, b| b.total_cmp(a));
            sorted.truncate(self.k);
            sorted
        })
    }
}
