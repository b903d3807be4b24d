use core::panic::AssertUnwindSafe;
use std::panic;

use crate::error::Result;
use crate::param::Config;
use crate::scorer::Scorer;

use super::{Proposal, Session};

impl Session {
    /// Run the search loop for `iterations` turns.
    ///
    /// Each turn proposes a configuration, scores it with `scorer` and
    /// records the outcome. A turn whose proposal is skipped (the tuner
    /// only produced duplicates) still counts. Scorer errors, panics and
    /// non-finite scores are recorded as failures and never abort the loop.
    ///
    /// Returns a copy of the best proposal so far, or `None` if nothing
    /// has been scored successfully.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllTunablesEliminated`](crate::Error::AllTunablesEliminated)
    /// as soon as a turn starts with no tunable left, and propagates tuner
    /// and selector errors. The session is left as it was, so the best
    /// result found before the last tunable was dropped can still be read
    /// with [`best_proposal`](Self::best_proposal).
    ///
    /// # Examples
    ///
    /// ```
    /// use tunebandit::hyperparameter::Hyperparameter;
    /// use tunebandit::tunable::Tunable;
    /// use tunebandit::{Config, Session};
    ///
    /// let mut session = Session::builder()
    ///     .tunable("lr", Tunable::new([("rate", Hyperparameter::float(1e-4, 1e-1))]).unwrap())
    ///     .seed(3)
    ///     .build()
    ///     .unwrap();
    ///
    /// let best = session
    ///     .run(8, |_tunable: &str, config: &Config| {
    ///         let rate = config["rate"].as_f64().unwrap();
    ///         Ok::<_, String>(-(rate - 0.01).abs())
    ///     })
    ///     .unwrap();
    ///
    /// assert!(best.is_some());
    /// assert_eq!(session.iterations(), 8);
    /// ```
    #[allow(clippy::needless_pass_by_value)]
    pub fn run<S: Scorer>(&mut self, iterations: usize, mut scorer: S) -> Result<Option<Proposal>> {
        let span = self.span.clone();
        let _enter = span.enter();

        for _ in 0..iterations {
            self.iterations += 1;
            self.log_progress();

            let Some(id) = self.propose_id()? else {
                continue;
            };
            let Some((tunable, config)) = self
                .proposals
                .get(&id)
                .map(|p| (p.tunable.clone(), p.config.clone()))
            else {
                continue;
            };

            let score = evaluate(&mut scorer, &tunable, &config);
            self.record_id(&id, score)?;

            if let Some(proposal) = self.proposals.get(&id) {
                scorer.after_record(self, proposal);
            }
        }

        Ok(self.best_proposal().cloned())
    }

    fn log_progress(&self) {
        let best = self.best_score();
        let active = self.active.len();
        if self.verbose {
            tracing::info!(iteration = self.iterations, ?best, active, "iteration");
        } else {
            tracing::debug!(iteration = self.iterations, ?best, active, "iteration");
        }
    }
}

/// Score a configuration, mapping every kind of failure to `None`.
pub(crate) fn evaluate<S: Scorer>(scorer: &mut S, tunable: &str, config: &Config) -> Option<f64> {
    match panic::catch_unwind(AssertUnwindSafe(|| scorer.score(tunable, config))) {
        Ok(Ok(score)) if score.is_finite() => Some(score),
        Ok(Ok(score)) => {
            tracing::debug!(tunable, score, "non-finite score");
            None
        }
        Ok(Err(error)) => {
            tracing::debug!(tunable, error = %error.to_string(), "scorer returned an error");
            None
        }
        Err(_) => {
            tracing::warn!(tunable, "scorer panicked");
            None
        }
    }
}
