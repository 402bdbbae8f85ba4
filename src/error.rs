//! Error handling for the Zodiak camera client

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Validation error (missing settings, out-of-range input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network error (camera unreachable, non-success status)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Parse error (camera params blob)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Credential store read/write failure
    #[error("Credential store error: {0}")]
    Credential(String),

    /// Collinear control points: no circle passes through them
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Contract violation in the auth state machine. Not reachable from a
    /// well-formed UI event sequence.
    #[error("Invalid transition: {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
