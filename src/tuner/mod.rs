//! Tuner trait and implementations for proposing configurations.
//!
//! A session owns one tuner per tunable. The tuner proposes
//! configurations for its tunable and learns from the normalized
//! ("larger is better") scores recorded against them.
//!
//! | Tuner | Strategy |
//! |-------|----------|
//! | [`SurrogateTuner`] | Surrogate model (GP by default) + acquisition function |
//! | [`UniformTuner`] | Uniform random sampling |
//!
//! Sessions build tuners from a [`TunerKind`], or from a custom factory
//! for any other [`Tuner`] implementation.

pub mod gp;
pub mod uniform;

pub use gp::{GpTunerBuilder, SurrogateTuner};
pub use uniform::UniformTuner;

use crate::error::Result;
use crate::param::Config;
use crate::tunable::Tunable;

/// Proposes configurations for one tunable and learns from their scores.
pub trait Tuner: Send {
    /// Proposes `n` configurations.
    ///
    /// Must return valid configurations even before any score has been
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration can be produced.
    fn propose(&mut self, n: usize) -> Result<Vec<Config>>;

    /// Records the normalized score of a configuration.
    ///
    /// Recording the same configuration more than once is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the model cannot
    /// be refitted. The observation may still have been kept.
    fn record(&mut self, config: &Config, score: f64) -> Result<()>;
}

/// Lifecycle of a model-based tuner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunerState {
    /// No model fitted yet; proposals are random.
    Unfit,
    /// A model is fitted and drives proposals.
    Fit,
}

/// The built-in tuner to create for each tunable.
#[derive(Clone, Debug)]
pub enum TunerKind {
    /// [`SurrogateTuner`] backed by a Gaussian process.
    GaussianProcess(GpTunerBuilder),
    /// [`UniformTuner`].
    Uniform,
}

impl Default for TunerKind {
    fn default() -> Self {
        Self::GaussianProcess(GpTunerBuilder::new())
    }
}

impl TunerKind {
    /// Builds a tuner for `tunable`.
    ///
    /// `seed` overrides any seed configured on the builder.
    #[must_use]
    pub fn build(&self, tunable: Tunable, seed: Option<u64>) -> Box<dyn Tuner> {
        match self {
            Self::GaussianProcess(builder) => {
                let mut builder = builder.clone();
                if let Some(seed) = seed {
                    builder = builder.seed(seed);
                }
                Box::new(builder.build(tunable))
            }
            Self::Uniform => Box::new(UniformTuner::new(tunable, seed)),
        }
    }
}

/// Keeps the best observation seen by a tuner.
#[derive(Clone, Debug, Default)]
pub(crate) struct BestObservation(Option<(Config, f64)>);

impl BestObservation {
    pub(crate) fn offer(&mut self, config: &Config, score: f64) {
        if self.0.as_ref().is_none_or(|(_, best)| score > *best) {
            self.0 = Some((config.clone(), score));
        }
    }

    pub(crate) fn get(&self) -> Option<(&Config, f64)> {
        self.0.as_ref().map(|(config, score)| (config, *score))
    }
}
