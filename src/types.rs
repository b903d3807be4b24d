//! Core types for the tuning session.

use serde::{Deserialize, Serialize};

/// The direction of optimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Lower scores are better.
    Minimize,
    /// Higher scores are better.
    #[default]
    Maximize,
}

impl Direction {
    /// Map a raw score onto the "larger is better" scale.
    #[must_use]
    pub fn normalize(self, score: f64) -> f64 {
        match self {
            Self::Maximize => score,
            Self::Minimize => -score,
        }
    }
}

/// The state of a proposal in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    /// Proposed but not recorded yet.
    Pending,
    /// The scorer returned a value.
    Scored,
    /// The scorer failed or returned no value.
    Failed,
}
