//! Routing error taxonomy.

/// Errors that can occur while routing a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    /// No journey reaches the destination within the search bounds.
    /// Turned into an empty response by the dynamic search.
    #[error("destination not reached")]
    DestinationNotReached,

    /// The request was cancelled by the caller or the worker pool
    #[error("search cancelled")]
    Cancelled,

    /// Malformed request, rejected before any search work
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Unrecognised optimisation profile name
    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    /// A heuristic search running on the worker pool failed
    #[error("heuristic search failed: {0}")]
    HeuristicSearchFailed(String),

    /// Invalid router configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failure reported by a routing worker
    #[error("routing worker failed: {0}")]
    Worker(String),
}

impl RoutingError {
    pub fn is_destination_not_reached(&self) -> bool {
        matches!(self, RoutingError::DestinationNotReached)
    }
}
