use sr_graph::GraphError;
use thiserror::Error;

use crate::orchestrate::RouteStage;

/// Rejections raised before any graph work.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("stop {stop_number}: invalid coordinate: {reason}")]
    InvalidCoordinate { stop_number: i64, reason: String },

    #[error("at least {min} successfully geocoded stops are required, got {found}")]
    InsufficientStops { found: usize, min: usize },

    #[error("at most {max} stops are allowed, got {found}")]
    TooManyStops { found: usize, max: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapError {
    #[error("road graph has no vertices")]
    EmptyGraph,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoPathReason {
    /// The search exhausted the graph without reaching the target.
    Unreachable,
    /// Both stops snapped to the same vertex.
    Degenerate,
}

impl std::fmt::Display for NoPathReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NoPathReason::Unreachable => "unreachable",
            NoPathReason::Degenerate => "both stops snap to the same vertex",
        })
    }
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("snapping failed: {0}")]
    Snap(#[from] SnapError),

    #[error("no path from stop {from_stop} to stop {to_stop} ({reason})")]
    NoPath {
        from_stop: i64,
        to_stop:   i64,
        reason:    NoPathReason,
    },

    #[error("routing engine error: {0}")]
    Engine(#[from] GraphError),
}

impl RoutingError {
    /// The pipeline state the request was in when it failed.
    pub fn stage(&self) -> RouteStage {
        match self {
            RoutingError::Validation(_) => RouteStage::Received,
            RoutingError::Snap(_) => RouteStage::Validated,
            RoutingError::NoPath { .. } | RoutingError::Engine(_) => RouteStage::Snapped,
        }
    }

    /// `true` for failures caused by the request itself rather than the
    /// engine.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RoutingError::Engine(_))
    }
}

pub type RoutingResult<T> = Result<T, RoutingError>;
