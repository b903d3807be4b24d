use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::param::Config;
use crate::scorer::Scorer;

use super::run::evaluate;
use super::{Proposal, Session};

/// A cloneable, thread-safe handle to a [`Session`].
///
/// Workers on different threads share one session through this handle.
/// [`evaluate_next`](Self::evaluate_next) holds the lock for a whole
/// propose → score → record turn, so turns never interleave and the
/// session state seen by one worker is always consistent.
///
/// # Examples
///
/// ```
/// use std::thread;
///
/// use tunebandit::hyperparameter::Hyperparameter;
/// use tunebandit::tunable::Tunable;
/// use tunebandit::{Config, Session, SharedSession};
///
/// let session = Session::builder()
///     .tunable("x", Tunable::new([("x", Hyperparameter::float(0.0, 1.0))]).unwrap())
///     .seed(9)
///     .build()
///     .unwrap();
/// let shared = SharedSession::new(session);
///
/// let workers: Vec<_> = (0..4)
///     .map(|_| {
///         let shared = shared.clone();
///         thread::spawn(move || {
///             let mut scorer = |_: &str, config: &Config| {
///                 Ok::<_, String>(config["x"].as_f64().unwrap_or(0.0))
///             };
///             for _ in 0..3 {
///                 shared.evaluate_next(&mut scorer).unwrap();
///             }
///         })
///     })
///     .collect();
/// for worker in workers {
///     worker.join().unwrap();
/// }
///
/// assert_eq!(shared.lock().proposals().len(), 12);
/// ```
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Wrap a session for sharing between threads.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run one turn: propose, score with `scorer` and record.
    ///
    /// Returns the recorded proposal, or `None` if the turn was skipped
    /// because only duplicates were drawn.
    ///
    /// # Errors
    ///
    /// Same as [`Session::propose`].
    pub fn evaluate_next<S: Scorer>(&self, scorer: &mut S) -> Result<Option<Proposal>> {
        let mut session = self.inner.lock();
        let Some(id) = session.propose_id()? else {
            return Ok(None);
        };
        let Some((tunable, config)) = session
            .proposal(&id)
            .map(|p| (p.tunable.clone(), p.config.clone()))
        else {
            return Ok(None);
        };

        let score = evaluate(scorer, &tunable, &config);
        session.record_id(&id, score)?;

        let session = &*session;
        Ok(session.proposal(&id).map(|proposal| {
            scorer.after_record(session, proposal);
            proposal.clone()
        }))
    }

    /// Propose under the lock. See [`Session::propose`].
    ///
    /// # Errors
    ///
    /// Same as [`Session::propose`].
    pub fn propose(&self) -> Result<Option<(String, Config)>> {
        self.inner.lock().propose()
    }

    /// Record under the lock. See [`Session::record`].
    ///
    /// # Errors
    ///
    /// Same as [`Session::record`].
    pub fn record(&self, tunable: &str, config: &Config, score: Option<f64>) -> Result<()> {
        self.inner.lock().record(tunable, config, score)
    }

    /// A copy of the best proposal so far.
    #[must_use]
    pub fn best_proposal(&self) -> Option<Proposal> {
        self.inner.lock().best_proposal().cloned()
    }

    /// Lock the session for direct access.
    #[must_use]
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock()
    }

    /// Take the session back if this is the last handle.
    ///
    /// # Errors
    ///
    /// Returns the handle unchanged if other clones are still alive.
    pub fn try_into_inner(self) -> core::result::Result<Session, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl core::fmt::Debug for SharedSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedSession").finish_non_exhaustive()
    }
}
