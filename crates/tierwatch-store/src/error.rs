//! Error types for the fleet bookkeeping store.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reading or rewriting the fleet file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("fleet file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fleet file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
