//! Multi-armed bandit selectors for choosing the next tunable.
//!
//! Each active tunable is an arm whose rewards are its normalized score
//! history. Selectors are only consulted once every arm has at least one
//! score.
//!
//! | Selector | Value estimate |
//! |----------|----------------|
//! | [`Ucb1`] | mean of all scores + exploration bonus |
//! | [`BestKReward`] | mean of the best `k` scores + exploration bonus |
//!
//! The exploration bonus is `sqrt(2 ln N / n)`, where `n` is the arm's pull
//! count and `N` the total pulls over all arms. Ties go to the arm with the
//! shortest history, then to the arm listed first.

mod best_k;
mod ucb1;

pub use best_k::BestKReward;
pub use ucb1::Ucb1;

use crate::error::{Error, Result};

/// Picks which tunable gets the next proposal.
pub trait Selector: Send {
    /// Returns the name of the arm to pull next.
    ///
    /// `arms` lists every active tunable with its normalized score history,
    /// in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCandidates`] if `arms` is empty and
    /// [`Error::EmptyHistory`] if an arm has no scores.
    fn select<'a>(&self, arms: &[(&'a str, &[f64])]) -> Result<&'a str>;
}

/// Upper-confidence-bound pick over per-arm rewards.
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
pub(crate) fn ucb_select<'a>(
    arms: &[(&'a str, &[f64])],
    rewards: impl Fn(&[f64]) -> Vec<f64>,
) -> Result<&'a str> {
    if arms.is_empty() {
        return Err(Error::NoCandidates);
    }
    if let Some((name, _)) = arms.iter().find(|(_, history)| history.is_empty()) {
        return Err(Error::EmptyHistory((*name).to_owned()));
    }

    let total_pulls: usize = arms.iter().map(|(_, history)| history.len()).sum();
    let ln_total = (total_pulls as f64).ln();

    let mut best: Option<(&'a str, f64, usize)> = None;
    for &(name, history) in arms {
        let pulls = history.len();
        let values = rewards(history);
        let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
        let value = mean + (2.0 * ln_total / pulls as f64).sqrt();

        let better = match best {
            None => true,
            Some((_, best_value, best_pulls)) => {
                value > best_value || (value == best_value && pulls < best_pulls)
            }
        };
        if better {
            best = Some((name, value, pulls));
        }
    }

    best.map(|(name, _, _)| name)
        .ok_or(Error::Internal("no arm selected"))
}
