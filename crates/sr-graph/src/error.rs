//! Graph-engine error type.

use std::time::Duration;

use thiserror::Error;

use sr_core::NodeId;

/// Errors produced by `sr-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("search from {from} to {to} timed out after {elapsed:?}")]
    Timeout { from: NodeId, to: NodeId, elapsed: Duration },

    #[error("search cancelled")]
    Cancelled,

    #[error("snapshot parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
