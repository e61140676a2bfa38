//! Error types for the Gateway

use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
///
/// The client-facing variants (`BadRequest` through `GatewayTimeout`) carry the exact
/// message placed in the `error` field of the JSON body.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Malformed client input
    #[error("{0}")]
    BadRequest(String),

    /// Function or version not registered
    #[error("{0}")]
    NotFound(String),

    /// Timed out before any executor work started
    #[error("{0}")]
    Timeout(String),

    /// Executor raised an error
    #[error("{0}")]
    Executor(String),

    /// Function type or executor intentionally not implemented
    #[error("{0}")]
    NotImplemented(String),

    /// Executor not configured or not reachable
    #[error("{0}")]
    Unavailable(String),

    /// Executor did not finish within its budget
    #[error("{0}")]
    GatewayTimeout(String),

    /// Window counter store errors
    #[error("Store error: {0}")]
    Store(String),

    /// HTTP server errors (bind, runtime)
    #[error("Server error: {0}")]
    Server(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
