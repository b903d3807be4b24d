//! Acquisition functions over surrogate predictions.
//!
//! An acquisition function receives one `(mean, std)` prediction per
//! candidate point, in the normalized "larger is better" score scale, and
//! picks the candidate(s) worth evaluating next.
//!
//! | Variant | Rule | Candidates per call |
//! |---------|------|---------------------|
//! | [`ExpectedImprovement`](Acquisition::ExpectedImprovement) | argmax of EI over the best score so far | exactly 1 |
//! | [`PredictedScore`](Acquisition::PredictedScore) | highest predicted means | any |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Standard deviations below this are floored before computing EI.
const MIN_STD: f64 = 1e-9;

/// The acquisition strategy used by a surrogate tuner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acquisition {
    /// Expected Improvement: `EI = σ (z Φ(z) + φ(z))` with
    /// `z = (μ - y_best) / σ`.
    #[default]
    ExpectedImprovement,
    /// Pick the candidates with the highest predicted mean.
    PredictedScore,
}

impl Acquisition {
    /// Returns the indices of the `n_candidates` most promising predictions.
    ///
    /// `y_best` is the best normalized score observed so far.
    ///
    /// # Errors
    ///
    /// - [`Error::NoCandidates`] if `predictions` is empty.
    /// - [`Error::BatchAcquisitionUnsupported`] if Expected Improvement is
    ///   asked for more than one candidate.
    /// - [`Error::InvalidOption`] if zero candidates, or more candidates than
    ///   predictions, are requested.
    pub fn acquire(
        self,
        predictions: &[(f64, f64)],
        y_best: f64,
        n_candidates: usize,
    ) -> Result<Vec<usize>> {
        if predictions.is_empty() {
            return Err(Error::NoCandidates);
        }
        if n_candidates == 0 {
            return Err(Error::InvalidOption("at least one candidate must be acquired"));
        }

        match self {
            Self::ExpectedImprovement => {
                if n_candidates > 1 {
                    return Err(Error::BatchAcquisitionUnsupported(n_candidates));
                }
                let scores: Vec<f64> = predictions
                    .iter()
                    .map(|&(mean, std)| expected_improvement(mean, std, y_best))
                    .collect();
                Ok(vec![argmax(&scores)])
            }
            Self::PredictedScore => {
                if n_candidates > predictions.len() {
                    return Err(Error::InvalidOption(
                        "more candidates requested than predictions available",
                    ));
                }
                let mut order: Vec<usize> = (0..predictions.len()).collect();
                // stable sort keeps the earlier index first among equal means
                order.sort_by(|&a, &b| {
                    let (ma, mb) = (finite_or_min(predictions[a].0), finite_or_min(predictions[b].0));
                    mb.total_cmp(&ma)
                });
                order.truncate(n_candidates);
                Ok(order)
            }
        }
    }
}

/// Expected Improvement of a prediction over `y_best`, maximizing.
///
/// A non-finite mean yields negative infinity. The standard deviation is
/// floored at a small positive value so the result is never NaN.
#[must_use]
pub fn expected_improvement(mean: f64, std: f64, y_best: f64) -> f64 {
    if !mean.is_finite() {
        return f64::NEG_INFINITY;
    }
    let sigma = if std.is_nan() { MIN_STD } else { std.max(MIN_STD) };
    let z = (mean - y_best) / sigma;
    sigma * (z * norm_cdf(z) + norm_pdf(z))
}

fn finite_or_min(x: f64) -> f64 {
    if x.is_nan() { f64::NEG_INFINITY } else { x }
}

/// Index of the first maximal value; NaN never wins.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    let mut best_value = finite_or_min(values[0]);
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Normal distribution helpers
// ---------------------------------------------------------------------------

/// Standard normal PDF.
pub(crate) fn norm_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF (Hart rational approximation).
pub(crate) fn norm_cdf(x: f64) -> f64 {
    if x < -8.0 {
        return 0.0;
    }
    if x > 8.0 {
        return 1.0;
    }

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * abs_x);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let poly = 0.319_381_530 * t - 0.356_563_782 * t2 + 1.781_477_937 * t3 - 1.821_255_978 * t4
        + 1.330_274_429 * t5;
    let cdf = 1.0 - norm_pdf(abs_x) * poly;

    if x >= 0.0 { cdf } else { 1.0 - cdf }
}
