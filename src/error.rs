#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned by `propose` once every tunable has been eliminated.
    #[error("all the tunables failed")]
    AllTunablesEliminated,

    /// Returned when a session is built without any tunable.
    #[error("a session needs at least one tunable")]
    NoTunables,

    /// Returned when two tunables share the same name.
    #[error("duplicate tunable name '{0}'")]
    DuplicateTunable(String),

    /// Returned when a tunable has no hyperparameters.
    #[error("tunable '{0}' has no hyperparameters")]
    EmptyTunable(String),

    /// Returned when a tunable name is not part of the session.
    #[error("unknown tunable '{0}'")]
    UnknownTunable(String),

    /// Returned when `record` is called for a configuration that was never proposed.
    #[error("no proposal recorded for tunable '{tunable}' with this configuration")]
    UnknownProposal {
        /// The tunable the configuration was recorded against.
        tunable: String,
    },

    /// Returned when a hyperparameter definition or value is invalid.
    #[error("invalid hyperparameter '{name}': {reason}")]
    InvalidHyperparameter {
        /// The name of the hyperparameter.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Returned when a normalized vector has the wrong length.
    #[error("dimension mismatch: expected {expected} values, got {got}")]
    DimensionMismatch {
        /// The expected number of values.
        expected: usize,
        /// The number of values received.
        got: usize,
    },

    /// Returned when a configuration holds NaN or an infinite value.
    #[error("configuration value '{key}' is not a finite number")]
    NonFiniteValue {
        /// The configuration key holding the value.
        key: String,
    },

    /// Returned when an acquisition function is asked for more candidates
    /// than it can select at once.
    #[error("acquisition of {0} candidates per call is not supported")]
    BatchAcquisitionUnsupported(usize),

    /// Returned when an acquisition function receives no predictions.
    #[error("no candidates to acquire from")]
    NoCandidates,

    /// Returned when a selector is handed an arm without any score.
    #[error("tunable '{0}' has an empty score history")]
    EmptyHistory(String),

    /// Returned when the surrogate model cannot be fitted.
    #[error("surrogate fit failed: {0}")]
    SurrogateFit(&'static str),

    /// Returned when a session or tunable option is out of range.
    #[error("invalid option: {0}")]
    InvalidOption(&'static str),

    /// Returned when JSON cannot be parsed or produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
