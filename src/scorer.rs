//! The [`Scorer`] trait defines how configurations are evaluated.
//!
//! For simple closures, pass them directly to
//! [`Session::run`](crate::Session::run):
//!
//! ```
//! use tunebandit::hyperparameter::Hyperparameter;
//! use tunebandit::tunable::Tunable;
//! use tunebandit::{Config, Session};
//!
//! let mut session = Session::builder()
//!     .tunable("line", Tunable::new([("x", Hyperparameter::float(0.0, 1.0))]).unwrap())
//!     .seed(1)
//!     .build()
//!     .unwrap();
//!
//! session
//!     .run(5, |_name: &str, config: &Config| {
//!         let x = config["x"].as_f64().ok_or("x is not a number")?;
//!         Ok::<_, &str>(x)
//!     })
//!     .unwrap();
//! ```
//!
//! To observe progress, implement [`Scorer`] on a struct and override
//! [`after_record`](Scorer::after_record):
//!
//! ```
//! use tunebandit::hyperparameter::Hyperparameter;
//! use tunebandit::tunable::Tunable;
//! use tunebandit::{Config, Proposal, Scorer, Session};
//!
//! struct Report;
//!
//! impl Scorer for Report {
//!     type Error = String;
//!
//!     fn score(&mut self, _tunable: &str, config: &Config) -> Result<f64, String> {
//!         config["n"].as_f64().ok_or_else(|| "n missing".to_owned())
//!     }
//!
//!     fn after_record(&mut self, session: &Session, proposal: &Proposal) {
//!         println!("{} {:?} -> {:?}", session.iterations(), proposal.config, proposal.score);
//!     }
//! }
//!
//! let mut session = Session::builder()
//!     .tunable("ints", Tunable::new([("n", Hyperparameter::int(0, 1000))]).unwrap())
//!     .build()
//!     .unwrap();
//! session.run(3, Report).unwrap();
//! assert!(session.best_proposal().is_some());
//! ```

use crate::param::Config;
use crate::session::{Proposal, Session};

/// Scores a configuration of a named tunable.
///
/// Returning `Err`, panicking, or returning a non-finite value all count
/// as a failed evaluation: the session records the failure against the
/// tunable and carries on.
pub trait Scorer {
    /// The error type returned by [`score`](Scorer::score).
    type Error: ToString;

    /// Evaluates `config` for the tunable `tunable`.
    ///
    /// # Errors
    ///
    /// Any error whose type implements `ToString`.
    fn score(&mut self, tunable: &str, config: &Config) -> Result<f64, Self::Error>;

    /// Called after each proposal's outcome has been recorded.
    ///
    /// Purely observational. Default: does nothing.
    fn after_record(&mut self, _session: &Session, _proposal: &Proposal) {}
}

impl<F, E> Scorer for F
where
    F: FnMut(&str, &Config) -> Result<f64, E>,
    E: ToString,
{
    type Error = E;

    fn score(&mut self, tunable: &str, config: &Config) -> Result<f64, E> {
        self(tunable, config)
    }
}
