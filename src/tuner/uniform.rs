use crate::error::{Error, Result};
use crate::param::Config;
use crate::rng_util;
use crate::tunable::Tunable;

use super::{BestObservation, Tuner};

/// Tuner that samples configurations uniformly at random.
///
/// Recorded scores are validated and tracked for [`best`](Self::best)
/// but never influence proposals. Useful as a baseline.
pub struct UniformTuner {
    tunable: Tunable,
    rng: fastrand::Rng,
    best: BestObservation,
}

impl UniformTuner {
    /// Creates a uniform tuner, optionally seeded.
    #[must_use]
    pub fn new(tunable: Tunable, seed: Option<u64>) -> Self {
        Self {
            tunable,
            rng: rng_util::make_rng(seed),
            best: BestObservation::default(),
        }
    }

    /// The best configuration recorded so far with its normalized score.
    #[must_use]
    pub fn best(&self) -> Option<(&Config, f64)> {
        self.best.get()
    }
}

impl Tuner for UniformTuner {
    fn propose(&mut self, n: usize) -> Result<Vec<Config>> {
        if n == 0 {
            return Err(Error::InvalidOption("at least one proposal must be requested"));
        }
        Ok((0..n)
            .map(|_| self.tunable.sample_config(&mut self.rng))
            .collect())
    }

    fn record(&mut self, config: &Config, score: f64) -> Result<()> {
        self.tunable.transform(config)?;
        self.best.offer(config, score);
        Ok(())
    }
}
