//! Error types.
//!
//! Configuration problems (bad catalog data, unknown targets, malformed PK
//! blocks) are detected once when registries and catalogs are built and are
//! reported as [`ConfigurationError`]. Numerical trouble during a run is never
//! an error: the engine repairs it per step and counts it in the run
//! diagnostics instead.

use thiserror::Error;

/// Load-time configuration failure. Always a data-entry bug.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("intervention '{intervention}': unknown pharmacological target '{target}'")]
    UnknownTarget { intervention: String, target: String },

    #[error("intervention '{intervention}': malformed PK model: {reason}")]
    MalformedPk { intervention: String, reason: String },

    #[error("intervention '{intervention}': missing required PK field '{field}'")]
    MissingPkField { intervention: String, field: &'static str },

    #[error("intervention '{intervention}': invalid PD effect on '{target}': {reason}")]
    InvalidPdEffect {
        intervention: String,
        target: String,
        reason: String,
    },

    #[error("intervention '{intervention}': invalid parameter '{param}': {reason}")]
    InvalidParameter {
        intervention: String,
        param: String,
        reason: String,
    },

    #[error("duplicate key '{0}'")]
    DuplicateKey(String),

    #[error("target name '{0}' is declared in more than one target class")]
    AmbiguousTarget(String),

    #[error("definition '{key}': {reason}")]
    InvalidDefinition { key: String, reason: String },

    #[error("composite '{composite}': {reason}")]
    InvalidComposite { composite: String, reason: String },
}

/// Returned when a request is submitted to a worker whose thread has exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("simulation worker has shut down")]
pub struct WorkerClosed;
