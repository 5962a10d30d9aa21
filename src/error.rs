//! Error taxonomy for the scoring core.
//!
//! Lead-shape problems (missing fields, unseen category values) are never
//! errors: imputation and unknown-category handling normalize them away.
//! The hard failures are configuration mismatches at training time and
//! artifact-level failures at load time.

use thiserror::Error;

/// Errors surfaced by the leadscore library.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Schema/training-data mismatch. Fatal at training time; training
    /// aborts before any artifact is written.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Artifact missing, unreadable, or structurally inconsistent
    /// (e.g. coefficient count differs from the preprocessor's output
    /// width). Callers must treat this as "scoring infrastructure down",
    /// not "this lead can't be scored".
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Persistence collaborator failure. Orchestration reports it and
    /// keeps going; a computed score is never withheld because of it.
    #[error("store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("dataframe error: {0}")]
    DataFrame(#[from] polars::error::PolarsError),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, ScoreError>;
