//! Error types for the Atlas API boundary.

use thiserror::Error;

/// Result type alias for Atlas API operations.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Failures at the Atlas API boundary.
///
/// `Transport` and `NotFound` skip the affected cluster or shard and the
/// run continues. `Rejected` means Atlas refused a mutation this system
/// constructed — usually deny-list drift against a newer API version —
/// and is surfaced to the operator without automatic retry.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cluster {0} not found")]
    NotFound(String),

    #[error("mutation rejected by Atlas (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Upstream failure (5xx) — transport-class, the caller skips and
    /// moves on.
    #[error("atlas returned HTTP {0}")]
    Status(u16),
}
