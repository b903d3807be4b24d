use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::hyperparameter::Hyperparameter;
use crate::selector::{Selector, Ucb1};
use crate::tunable::Tunable;
use crate::tuner::{Tuner, TunerKind};
use crate::types::Direction;

use super::{Session, TunerSource};

/// A builder for constructing [`Session`] instances with a fluent API.
///
/// Created via [`Session::builder()`].
///
/// # Defaults
///
/// - Direction: [`Maximize`](Direction::Maximize)
/// - Selector: [`Ucb1`]
/// - Tuner: [`TunerKind::GaussianProcess`] with expected improvement
/// - `max_errors`: 1
/// - `max_retries`: 10
///
/// # Examples
///
/// ```
/// use tunebandit::prelude::*;
///
/// let session = Session::builder()
///     .tunables_from_json(
///         r#"{
///             "svm": {"c": {"type": "float", "range": [0.01, 10.0]}},
///             "tree": {"depth": {"type": "int", "range": [1, 12]}}
///         }"#,
///     )
///     .unwrap()
///     .minimize()
///     .selector(BestKReward::new(2))
///     .max_errors(3)
///     .build()
///     .unwrap();
///
/// assert_eq!(session.active_tunables(), ["svm", "tree"]);
/// assert_eq!(session.direction(), Direction::Minimize);
/// ```
pub struct SessionBuilder {
    tunables: Vec<(String, Tunable)>,
    direction: Direction,
    max_errors: usize,
    max_retries: usize,
    selector: Option<Box<dyn Selector>>,
    tuner_source: Option<TunerSource>,
    seed: Option<u64>,
    verbose: bool,
    label: Option<String>,
}

impl SessionBuilder {
    pub(super) fn new() -> Self {
        Self {
            tunables: Vec::new(),
            direction: Direction::Maximize,
            max_errors: 1,
            max_retries: 10,
            selector: None,
            tuner_source: None,
            seed: None,
            verbose: false,
            label: None,
        }
    }

    /// Add a named tunable. Tunables are served in the order they are added.
    #[must_use]
    pub fn tunable(mut self, name: impl Into<String>, tunable: Tunable) -> Self {
        self.tunables.push((name.into(), tunable));
        self
    }

    /// Add several named tunables.
    #[must_use]
    pub fn tunables<N, I>(mut self, tunables: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Tunable)>,
    {
        self.tunables
            .extend(tunables.into_iter().map(|(name, t)| (name.into(), t)));
        self
    }

    /// Add tunables from a JSON object mapping names to tunable specs.
    ///
    /// Tunables from one document are added in name order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the document is malformed and
    /// [`Error::InvalidHyperparameter`] if a definition is invalid.
    pub fn tunables_from_json(self, spec: &str) -> Result<Self> {
        let parsed: BTreeMap<String, BTreeMap<String, Hyperparameter>> =
            serde_json::from_str(spec)?;
        let tunables = parsed
            .into_iter()
            .map(|(name, hps)| Ok((name, Tunable::try_from(hps)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.tunables(tunables))
    }

    /// Set the optimization direction to maximize (the default).
    #[must_use]
    pub fn maximize(mut self) -> Self {
        self.direction = Direction::Maximize;
        self
    }

    /// Set the optimization direction to minimize.
    #[must_use]
    pub fn minimize(mut self) -> Self {
        self.direction = Direction::Minimize;
        self
    }

    /// Set the optimization direction explicitly.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Number of failed evaluations after which a tunable is eliminated.
    #[must_use]
    pub fn max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Number of draws from a tuner before a duplicate-only turn is skipped.
    #[must_use]
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the selector that picks between tunables.
    #[must_use]
    pub fn selector(mut self, selector: impl Selector + 'static) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    /// Use a built-in tuner for every tunable.
    #[must_use]
    pub fn tuner(mut self, kind: TunerKind) -> Self {
        self.tuner_source = Some(TunerSource::Kind(kind));
        self
    }

    /// Use a custom tuner, built lazily the first time a tunable is proposed.
    ///
    /// The session seed is not forwarded to the factory.
    #[must_use]
    pub fn tuner_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str, Tunable) -> Box<dyn Tuner> + Send + 'static,
    {
        self.tuner_source = Some(TunerSource::Factory(Box::new(factory)));
        self
    }

    /// Seed the built-in tuners. Each tunable gets `seed + index`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Log per-iteration progress at info level instead of debug.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Label attached to the session's tracing span.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build the [`Session`].
    ///
    /// # Errors
    ///
    /// - [`Error::NoTunables`] if no tunable was added.
    /// - [`Error::DuplicateTunable`] if a name was added twice.
    /// - [`Error::EmptyTunable`] if a tunable has no hyperparameters.
    /// - [`Error::InvalidOption`] if `max_errors` or `max_retries` is zero.
    pub fn build(self) -> Result<Session> {
        if self.tunables.is_empty() {
            return Err(Error::NoTunables);
        }
        for (i, (name, tunable)) in self.tunables.iter().enumerate() {
            if self.tunables[..i].iter().any(|(other, _)| other == name) {
                return Err(Error::DuplicateTunable(name.clone()));
            }
            if tunable.is_empty() {
                return Err(Error::EmptyTunable(name.clone()));
            }
        }
        if self.max_errors == 0 {
            return Err(Error::InvalidOption("max_errors must be at least 1"));
        }
        if self.max_retries == 0 {
            return Err(Error::InvalidOption("max_retries must be at least 1"));
        }

        let label = self.label.unwrap_or_else(|| "session".to_owned());
        let span = tracing::info_span!("session", label = %label);
        span.in_scope(|| {
            tracing::debug!(
                tunables = self.tunables.len(),
                direction = ?self.direction,
                max_errors = self.max_errors,
                max_retries = self.max_retries,
                "session created"
            );
        });

        let active = self.tunables.iter().map(|(name, _)| name.clone()).collect();

        Ok(Session {
            direction: self.direction,
            max_errors: self.max_errors,
            max_retries: self.max_retries,
            verbose: self.verbose,
            seed: self.seed,
            specs: self.tunables,
            active,
            tuner_source: self
                .tuner_source
                .unwrap_or_else(|| TunerSource::Kind(TunerKind::default())),
            tuners: HashMap::new(),
            selector: self.selector.unwrap_or_else(|| Box::new(Ucb1)),
            proposals: HashMap::new(),
            scores: HashMap::new(),
            errors: HashMap::new(),
            best_id: None,
            best_normalized: f64::NEG_INFINITY,
            iterations: 0,
            span,
        })
    }
}
