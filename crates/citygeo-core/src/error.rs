// crates/citygeo-core/src/error.rs
use thiserror::Error;

/// File-level failures. Any of these aborts the run.
///
/// Per-record lookup problems are not represented here; they are reported as
/// [`crate::LookupOutcome::Failed`] and never stop the loop.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("{0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, GeoError>;
