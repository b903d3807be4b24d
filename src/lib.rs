#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Hyperparameter search across several competing tunables. A bandit
//! selector decides which tunable gets the next evaluation and a
//! per-tunable Bayesian tuner (Gaussian process + expected improvement)
//! decides what to try in it. Failing tunables are dropped, duplicate
//! proposals are skipped and the best configuration is tracked throughout.
//!
//! # Getting Started
//!
//! ```
//! use tunebandit::prelude::*;
//!
//! let mut session = Session::builder()
//!     .tunables_from_json(
//!         r#"{
//!             "linear": {"alpha": {"type": "float", "range": [0.0, 1.0]}},
//!             "forest": {
//!                 "depth": {"type": "int", "range": [1, 16]},
//!                 "bootstrap": {"type": "bool"}
//!             }
//!         }"#,
//!     )
//!     .unwrap()
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let best = session
//!     .run(25, |tunable: &str, config: &Config| {
//!         Ok::<_, String>(match tunable {
//!             "linear" => 1.0 - (config["alpha"].as_f64().unwrap() - 0.3).abs(),
//!             _ => config["depth"].as_f64().unwrap() / 16.0,
//!         })
//!     })
//!     .unwrap()
//!     .unwrap();
//!
//! println!("{}: {:?} -> {:?}", best.tunable, best.config, best.score);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Session`] | Drive the search: pick a tunable, propose, record, track the best. |
//! | [`Tunable`](tunable::Tunable) | A named search space made of [`Hyperparameter`](hyperparameter::Hyperparameter)s. |
//! | [`Tuner`](tuner::Tuner) | Proposes configurations for one tunable and learns from scores. |
//! | [`Selector`](selector::Selector) | Bandit strategy choosing which tunable to explore next. |
//! | [`Scorer`] | The user's evaluation function. |
//! | [`Direction`] | Whether the session maximizes or minimizes scores. |
//!
//! # Strategies
//!
//! | Concern | Options | Default |
//! |---------|---------|---------|
//! | Tunable choice | [`Ucb1`](selector::Ucb1), [`BestKReward`](selector::BestKReward) | `Ucb1` |
//! | Configuration choice | [`SurrogateTuner`](tuner::SurrogateTuner), [`UniformTuner`](tuner::UniformTuner), custom via `tuner_factory` | GP surrogate |
//! | Acquisition | [`ExpectedImprovement`](acquisition::Acquisition::ExpectedImprovement), [`PredictedScore`](acquisition::Acquisition::PredictedScore) | expected improvement |
//!
//! # Logging
//!
//! Events are emitted through [`tracing`](https://docs.rs/tracing) inside a
//! per-session `session` span. Install any subscriber to see them.

pub mod acquisition;
mod error;
pub mod fingerprint;
pub mod hyperparameter;
mod param;
mod rng_util;
mod scorer;
pub mod selector;
mod session;
pub mod surrogate;
pub mod tunable;
pub mod tuner;
mod types;

pub use error::{Error, Result};
pub use param::{Config, ParamValue};
pub use scorer::Scorer;
pub use session::{Proposal, Session, SessionBuilder, SharedSession, TunerFactory};
pub use types::{Direction, ProposalState};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use tunebandit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::Acquisition;
    pub use crate::error::{Error, Result};
    pub use crate::hyperparameter::Hyperparameter;
    pub use crate::param::{Config, ParamValue};
    pub use crate::scorer::Scorer;
    pub use crate::selector::{BestKReward, Selector, Ucb1};
    pub use crate::session::{Proposal, Session, SessionBuilder, SharedSession};
    pub use crate::tunable::Tunable;
    pub use crate::tuner::{GpTunerBuilder, SurrogateTuner, Tuner, TunerKind, UniformTuner};
    pub use crate::types::{Direction, ProposalState};
}
