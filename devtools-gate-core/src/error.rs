//! Error types for devtools-gate.
//!
//! Request-scoped failures are turned into HTTP responses by
//! [`GateError::status_code`]; the remaining variants only occur at startup.

use thiserror::Error;

/// Result type alias for devtools-gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Unified error type for devtools-gate operations.
///
/// # Example
///
/// ```
/// use devtools_gate_core::error::GateError;
/// use hyper::StatusCode;
///
/// let err = GateError::MethodNotImplemented("PATCH".into());
/// assert_eq!(err.status_code(), StatusCode::NOT_IMPLEMENTED);
/// ```
#[derive(Debug, Error)]
pub enum GateError {
    /// Missing, malformed or mismatched credential while a secret is configured.
    #[error("Unauthorized")]
    Unauthorized,

    /// HTTP method outside GET, POST, PUT, DELETE and HEAD.
    #[error("Unsupported method ({0})")]
    MethodNotImplemented(String),

    /// The upstream request failed, or the upstream answered with an error
    /// status that the client surfaced as a failure.
    ///
    /// The message includes every underlying cause, so a refused connection
    /// reads `... Connection refused (os error 111)`.
    #[error("Proxy error: {}", with_causes(.0))]
    Upstream(#[from] reqwest::Error),

    /// Any other failure while forwarding a request.
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// The shared HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    /// Configuration error (missing or invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure on the listening socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    /// Returns the HTTP status code that should be sent to the client.
    pub fn status_code(&self) -> hyper::StatusCode {
        use hyper::StatusCode;

        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Upstream(_) | Self::Proxy(_) => StatusCode::BAD_GATEWAY,
            Self::ClientBuild(_) | Self::Config(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns true if this error should be logged at warn level or above.
    ///
    /// Denials and unsupported methods are routine and only logged at debug.
    pub fn is_server_error(&self) -> bool {
        !matches!(self, Self::Unauthorized | Self::MethodNotImplemented(_))
    }
}

/// Renders an error followed by each cause in its `source()` chain.
///
/// Causes whose text is already part of the message are skipped.
pub fn with_causes(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
