//! Surrogate-model tuner with acquisition-driven proposals.
//!
//! # Algorithm overview
//!
//! 1. **Unfit**: until the first observation has been fitted, proposals
//!    are sampled uniformly at random from the tunable.
//! 2. **Record**: every recorded score is appended to the observation set
//!    (duplicates included) and the surrogate is refitted on all of it.
//! 3. **Propose**: `n_candidates` random points are drawn from the
//!    tunable, the surrogate predicts `(mean, std)` for each, and the
//!    [`Acquisition`] picks the best one, which is decoded back into a
//!    configuration.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `n_candidates` | 1000 | Random candidates scored per proposal |
//! | `noise_variance` | 1e-6 | Observation noise added to the kernel diagonal |
//! | `acquisition` | Expected Improvement | Rule used to pick among candidates |
//! | `seed` | random | RNG seed for reproducibility |
//!
//! # Examples
//!
//! ```
//! use tunebandit::hyperparameter::Hyperparameter;
//! use tunebandit::tunable::Tunable;
//! use tunebandit::tuner::{GpTunerBuilder, Tuner};
//!
//! let tunable = Tunable::new([("x", Hyperparameter::float(-5.0, 5.0))]).unwrap();
//! let mut tuner = GpTunerBuilder::new().n_candidates(200).seed(42).build(tunable);
//!
//! for _ in 0..10 {
//!     let config = tuner.propose(1).unwrap().remove(0);
//!     let x = config["x"].as_f64().unwrap();
//!     tuner.record(&config, -(x - 1.0).powi(2)).unwrap();
//! }
//! assert!(tuner.best().is_some());
//! ```

use crate::acquisition::Acquisition;
use crate::error::{Error, Result};
use crate::param::Config;
use crate::rng_util;
use crate::surrogate::{GaussianProcess, Surrogate};
use crate::tunable::Tunable;

use super::{BestObservation, Tuner, TunerState};

/// Default number of candidate points scored per proposal.
const DEFAULT_N_CANDIDATES: usize = 1000;
/// Default observation noise variance.
const DEFAULT_NOISE_VAR: f64 = 1e-6;

/// Builder for a Gaussian-process [`SurrogateTuner`].
///
/// All options have sensible defaults:
/// - `n_candidates`: 1000
/// - `noise_variance`: 1e-6
/// - `acquisition`: [`Acquisition::ExpectedImprovement`]
/// - `seed`: random
#[derive(Clone, Debug, Default)]
pub struct GpTunerBuilder {
    n_candidates: Option<usize>,
    noise_variance: Option<f64>,
    acquisition: Option<Acquisition>,
    seed: Option<u64>,
}

impl GpTunerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of random candidates scored per proposal.
    ///
    /// Values below 1 are raised to 1.
    #[must_use]
    pub fn n_candidates(mut self, n: usize) -> Self {
        self.n_candidates = Some(n.max(1));
        self
    }

    /// Sets the observation noise variance added to the kernel diagonal.
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = Some(v);
        self
    }

    /// Sets the acquisition function.
    #[must_use]
    pub fn acquisition(mut self, acquisition: Acquisition) -> Self {
        self.acquisition = Some(acquisition);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds a GP-backed tuner for `tunable`.
    #[must_use]
    pub fn build(self, tunable: Tunable) -> SurrogateTuner<GaussianProcess> {
        let surrogate =
            GaussianProcess::with_noise_variance(self.noise_variance.unwrap_or(DEFAULT_NOISE_VAR));
        SurrogateTuner {
            tunable,
            surrogate,
            acquisition: self.acquisition.unwrap_or_default(),
            n_candidates: self.n_candidates.unwrap_or(DEFAULT_N_CANDIDATES),
            rng: rng_util::make_rng(self.seed),
            state: TunerState::Unfit,
            x: Vec::new(),
            y: Vec::new(),
            best: BestObservation::default(),
        }
    }
}

/// Tuner that proposes configurations through a surrogate model and an
/// acquisition function.
pub struct SurrogateTuner<M: Surrogate = GaussianProcess> {
    tunable: Tunable,
    surrogate: M,
    acquisition: Acquisition,
    n_candidates: usize,
    rng: fastrand::Rng,
    state: TunerState,
    /// Encoded observations.
    x: Vec<Vec<f64>>,
    /// Normalized scores, aligned with `x`.
    y: Vec<f64>,
    best: BestObservation,
}

impl SurrogateTuner<GaussianProcess> {
    /// Creates a GP-backed tuner with default settings.
    #[must_use]
    pub fn new(tunable: Tunable) -> Self {
        GpTunerBuilder::new().build(tunable)
    }

    /// Creates a builder for a GP-backed tuner.
    #[must_use]
    pub fn builder() -> GpTunerBuilder {
        GpTunerBuilder::new()
    }
}

impl<M: Surrogate> SurrogateTuner<M> {
    /// Creates a tuner around a custom surrogate model.
    #[must_use]
    pub fn with_surrogate(
        tunable: Tunable,
        surrogate: M,
        acquisition: Acquisition,
        n_candidates: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            tunable,
            surrogate,
            acquisition,
            n_candidates: n_candidates.max(1),
            rng: rng_util::make_rng(seed),
            state: TunerState::Unfit,
            x: Vec::new(),
            y: Vec::new(),
            best: BestObservation::default(),
        }
    }

    /// Whether proposals are driven by a fitted model.
    #[must_use]
    pub fn state(&self) -> TunerState {
        self.state
    }

    /// Number of recorded observations.
    #[must_use]
    pub fn n_observations(&self) -> usize {
        self.y.len()
    }

    /// The best configuration recorded so far with its normalized score.
    #[must_use]
    pub fn best(&self) -> Option<(&Config, f64)> {
        self.best.get()
    }

    /// The tunable this tuner searches.
    #[must_use]
    pub fn tunable(&self) -> &Tunable {
        &self.tunable
    }

    fn propose_random(&mut self, n: usize) -> Vec<Config> {
        (0..n)
            .map(|_| self.tunable.sample_config(&mut self.rng))
            .collect()
    }

    fn propose_acquired(&mut self, n: usize) -> Result<Vec<Config>> {
        let candidates = self.tunable.sample(&mut self.rng, self.n_candidates)?;
        let predictions = candidates
            .iter()
            .map(|candidate| self.surrogate.predict(candidate))
            .collect::<Result<Vec<_>>>()?;
        let y_best = self
            .y
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        self.acquisition
            .acquire(&predictions, y_best, n)?
            .into_iter()
            .map(|i| self.tunable.reverse_transform(&candidates[i]))
            .collect()
    }
}

impl<M: Surrogate> Tuner for SurrogateTuner<M> {
    fn propose(&mut self, n: usize) -> Result<Vec<Config>> {
        if n == 0 {
            return Err(Error::InvalidOption("at least one proposal must be requested"));
        }
        match self.state {
            TunerState::Unfit => Ok(self.propose_random(n)),
            TunerState::Fit => self.propose_acquired(n),
        }
    }

    fn record(&mut self, config: &Config, score: f64) -> Result<()> {
        let encoded = self.tunable.transform(config)?;
        self.x.push(encoded);
        self.y.push(score);
        self.best.offer(config, score);

        self.surrogate.fit(&self.x, &self.y)?;
        self.state = TunerState::Fit;
        Ok(())
    }
}
