//! Error types for topology handling.

use thiserror::Error;

/// Result type alias for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Structural failures in a topology document.
///
/// All of these are fatal to the owning cluster's mutation: the document
/// is never partially repaired or partially submitted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("replication spec count changed during normalization: read {read}, writing {writing}")]
    ShapeMismatch { read: usize, writing: usize },

    #[error("no region config for shard[{shard_index}]")]
    NoRegionConfig { shard_index: usize },

    #[error("no electableSpecs for shard[{shard_index}]")]
    MissingSpecs { shard_index: usize },
}
