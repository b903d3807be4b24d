//! Session implementation: the propose → score → record loop.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fingerprint::fingerprint;
use crate::param::Config;
use crate::selector::Selector;
use crate::tunable::Tunable;
use crate::tuner::{Tuner, TunerKind};
use crate::types::{Direction, ProposalState};

mod builder;
mod run;
mod shared;

pub use builder::SessionBuilder;
pub use shared::SharedSession;

/// Builds a custom tuner for a named tunable.
pub type TunerFactory = Box<dyn Fn(&str, Tunable) -> Box<dyn Tuner> + Send>;

/// Where a session gets its tuners from.
pub(crate) enum TunerSource {
    Kind(TunerKind),
    Factory(TunerFactory),
}

/// A configuration proposed for a tunable, with its outcome once recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Fingerprint of `(tunable, config)`.
    pub id: String,
    /// Name of the tunable the configuration belongs to.
    pub tunable: String,
    /// The proposed configuration.
    pub config: Config,
    /// The raw score, once recorded successfully.
    pub score: Option<f64>,
    /// Lifecycle state.
    pub state: ProposalState,
}

/// Searches several tunables at once under a shared evaluation budget.
///
/// A session decides which tunable to explore next with a bandit
/// [`Selector`] and what to try within it with one [`Tuner`] per tunable.
/// Every tunable gets one proposal (in declaration order) before the
/// selector is consulted. Proposals are deduplicated by fingerprint, and a
/// tunable whose scorer fails `max_errors` times is dropped for the rest of
/// the session.
///
/// # Examples
///
/// ```
/// use tunebandit::hyperparameter::Hyperparameter;
/// use tunebandit::tunable::Tunable;
/// use tunebandit::{Config, Session};
///
/// let quadratic = Tunable::new([("x", Hyperparameter::float(-5.0, 5.0))]).unwrap();
/// let step = Tunable::new([("n", Hyperparameter::int(0, 10))]).unwrap();
///
/// let mut session = Session::builder()
///     .tunable("quadratic", quadratic)
///     .tunable("step", step)
///     .minimize()
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let best = session
///     .run(20, |name: &str, config: &Config| {
///         Ok::<_, String>(match name {
///             "quadratic" => (config["x"].as_f64().unwrap() - 1.0).powi(2),
///             _ => 10.0 - config["n"].as_f64().unwrap(),
///         })
///     })
///     .unwrap()
///     .unwrap();
///
/// assert!(best.score.unwrap() < 10.0);
/// ```
pub struct Session {
    pub(crate) direction: Direction,
    pub(crate) max_errors: usize,
    pub(crate) max_retries: usize,
    pub(crate) verbose: bool,
    pub(crate) seed: Option<u64>,
    /// Tunables in declaration order; never mutated.
    pub(crate) specs: Vec<(String, Tunable)>,
    /// Names still eligible for proposals, in declaration order.
    pub(crate) active: Vec<String>,
    pub(crate) tuner_source: TunerSource,
    pub(crate) tuners: HashMap<String, Box<dyn Tuner>>,
    pub(crate) selector: Box<dyn Selector>,
    pub(crate) proposals: HashMap<String, Proposal>,
    /// Normalized score history per active tunable.
    pub(crate) scores: HashMap<String, Vec<f64>>,
    pub(crate) errors: HashMap<String, usize>,
    pub(crate) best_id: Option<String>,
    pub(crate) best_normalized: f64,
    pub(crate) iterations: usize,
    pub(crate) span: tracing::Span,
}

impl Session {
    /// Return a [`SessionBuilder`] for constructing a session with a fluent API.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Proposes the next configuration to evaluate.
    ///
    /// Tunables that have no score yet are served first, in declaration
    /// order, with a single draw each. A repeated configuration is proposed
    /// again so that a failing tunable keeps counting errors until it is
    /// eliminated. After that the selector picks the tunable. If the chosen
    /// tuner keeps returning configurations that were already proposed,
    /// `Ok(None)` is returned after `max_retries` draws and the caller
    /// should skip this turn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllTunablesEliminated`] once no tunable is left,
    /// and propagates tuner and selector errors.
    pub fn propose(&mut self) -> Result<Option<(String, Config)>> {
        let id = self.propose_id()?;
        Ok(id.and_then(|id| {
            self.proposals
                .get(&id)
                .map(|p| (p.tunable.clone(), p.config.clone()))
        }))
    }

    pub(crate) fn propose_id(&mut self) -> Result<Option<String>> {
        let span = self.span.clone();
        let _enter = span.enter();

        if self.active.is_empty() {
            return Err(Error::AllTunablesEliminated);
        }

        if let Some(name) = self.next_untried() {
            self.materialize(&name)?;
            let (id, config) = self.draw(&name)?;
            if self.proposals.contains_key(&id) {
                tracing::debug!(tunable = %name, "untried tunable repeated a proposal");
            }
            self.register(&id, &name, config);
            return Ok(Some(id));
        }

        let name = self.select()?;
        self.draw_novel(&name)
    }

    /// First active tunable without any recorded score.
    fn next_untried(&self) -> Option<String> {
        self.active
            .iter()
            .find(|name| self.scores.get(*name).is_none_or(Vec::is_empty))
            .cloned()
    }

    fn select(&self) -> Result<String> {
        let arms: Vec<(&str, &[f64])> = self
            .active
            .iter()
            .map(|name| {
                let history = self.scores.get(name).map_or(&[][..], Vec::as_slice);
                (name.as_str(), history)
            })
            .collect();
        let name = self.selector.select(&arms)?;
        tracing::trace!(tunable = name, "selector pick");
        Ok(name.to_owned())
    }

    /// Build the tuner for `name` on first use.
    fn materialize(&mut self, name: &str) -> Result<()> {
        if self.tuners.contains_key(name) {
            return Ok(());
        }
        let (index, tunable) = self
            .specs
            .iter()
            .enumerate()
            .find(|(_, (spec_name, _))| spec_name == name)
            .map(|(i, (_, tunable))| (i, tunable.clone()))
            .ok_or_else(|| Error::UnknownTunable(name.to_owned()))?;

        let tuner = match &self.tuner_source {
            TunerSource::Kind(kind) => {
                let seed = self.seed.map(|s| s.wrapping_add(index as u64));
                kind.build(tunable, seed)
            }
            TunerSource::Factory(factory) => factory(name, tunable),
        };
        tracing::debug!(tunable = name, "tuner created");
        self.tuners.insert(name.to_owned(), tuner);
        Ok(())
    }

    /// Ask the tunable's tuner for one configuration and fingerprint it.
    fn draw(&mut self, name: &str) -> Result<(String, Config)> {
        let tuner = self
            .tuners
            .get_mut(name)
            .ok_or(Error::Internal("tuner missing for active tunable"))?;
        let config = tuner
            .propose(1)?
            .into_iter()
            .next()
            .ok_or(Error::Internal("tuner returned no configuration"))?;
        let id = fingerprint(name, &config)?;
        Ok((id, config))
    }

    /// Store `config` as a pending proposal, replacing any earlier outcome.
    fn register(&mut self, id: &str, name: &str, config: Config) {
        self.proposals.insert(
            id.to_owned(),
            Proposal {
                id: id.to_owned(),
                tunable: name.to_owned(),
                config,
                score: None,
                state: ProposalState::Pending,
            },
        );
    }

    /// Draw until the fingerprint is new, at most `max_retries` times.
    fn draw_novel(&mut self, name: &str) -> Result<Option<String>> {
        for attempt in 1..=self.max_retries {
            let (id, config) = self.draw(name)?;
            if self.proposals.contains_key(&id) {
                tracing::trace!(tunable = name, attempt, "duplicate proposal");
                continue;
            }
            self.register(&id, name, config);
            return Ok(Some(id));
        }

        tracing::info!(
            tunable = name,
            attempts = self.max_retries,
            "no new config sampled, skipping"
        );
        Ok(None)
    }

    /// Records the outcome of a proposed configuration.
    ///
    /// `None`, NaN and infinite scores count as failures. A failure
    /// increments the tunable's error counter and eliminates the tunable
    /// once the counter reaches `max_errors`. A successful score updates
    /// the best proposal if it improves on it, extends the tunable's score
    /// history and refits its tuner. Refit errors are logged, not returned.
    ///
    /// Outcomes for a tunable that has already been eliminated are stored
    /// on the proposal but otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProposal`] if this configuration was never
    /// proposed for `tunable`, and [`Error::NonFiniteValue`] if the
    /// configuration cannot be fingerprinted.
    pub fn record(&mut self, tunable: &str, config: &Config, score: Option<f64>) -> Result<()> {
        let id = fingerprint(tunable, config)?;
        if !self.proposals.contains_key(&id) {
            return Err(Error::UnknownProposal {
                tunable: tunable.to_owned(),
            });
        }
        self.record_id(&id, score)
    }

    pub(crate) fn record_id(&mut self, id: &str, score: Option<f64>) -> Result<()> {
        let span = self.span.clone();
        let _enter = span.enter();

        let score = score.filter(|s| s.is_finite());
        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or(Error::Internal("recorded proposal is missing"))?;
        proposal.score = score;
        proposal.state = if score.is_some() {
            ProposalState::Scored
        } else {
            ProposalState::Failed
        };
        let name = proposal.tunable.clone();
        let config = proposal.config.clone();

        if !self.active.contains(&name) {
            tracing::debug!(tunable = %name, "outcome for eliminated tunable ignored");
            return Ok(());
        }

        let Some(score) = score else {
            self.handle_error(&name);
            return Ok(());
        };

        let normalized = self.direction.normalize(score);
        if normalized > self.best_normalized {
            tracing::info!(tunable = %name, score, "new optimal found");
            self.best_id = Some(id.to_owned());
            self.best_normalized = normalized;
        }

        self.scores.entry(name.clone()).or_default().push(normalized);

        if let Some(tuner) = self.tuners.get_mut(&name)
            && let Err(error) = tuner.record(&config, normalized)
        {
            tracing::warn!(tunable = %name, %error, "could not record score to tuner");
        }
        Ok(())
    }

    fn handle_error(&mut self, name: &str) {
        let errors = self.errors.entry(name.to_owned()).or_default();
        *errors += 1;
        let errors = *errors;
        tracing::debug!(tunable = name, errors, "scoring failed");

        if errors >= self.max_errors {
            tracing::warn!(tunable = name, errors, "too many errors, removing tunable");
            self.active.retain(|active| active != name);
            self.scores.remove(name);
            self.tuners.remove(name);
        }
    }

    /// The optimization direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The proposal with the best score recorded so far.
    #[must_use]
    pub fn best_proposal(&self) -> Option<&Proposal> {
        self.best_id.as_ref().and_then(|id| self.proposals.get(id))
    }

    /// The raw score of [`best_proposal`](Self::best_proposal).
    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        self.best_proposal().and_then(|p| p.score)
    }

    /// Every proposal made so far, keyed by id.
    #[must_use]
    pub fn proposals(&self) -> &HashMap<String, Proposal> {
        &self.proposals
    }

    /// Looks up a proposal by id.
    #[must_use]
    pub fn proposal(&self, id: &str) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// Names of the tunables still eligible for proposals, in declaration order.
    #[must_use]
    pub fn active_tunables(&self) -> &[String] {
        &self.active
    }

    /// The normalized score history of a tunable (empty once eliminated).
    #[must_use]
    pub fn scores(&self, tunable: &str) -> &[f64] {
        self.scores.get(tunable).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of failed evaluations recorded for a tunable.
    #[must_use]
    pub fn errors(&self, tunable: &str) -> usize {
        self.errors.get(tunable).copied().unwrap_or(0)
    }

    /// Number of loop iterations performed by [`run`](Self::run).
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether every tunable has been eliminated.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.active.is_empty()
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("direction", &self.direction)
            .field("active", &self.active)
            .field("proposals", &self.proposals.len())
            .field("best_id", &self.best_id)
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}
