use thiserror::Error;

/// Direct API server errors
///
/// These are transport-tier failures: they never travel inside a JSON-RPC
/// envelope. Protocol-tier and tool-tier failures are carried by
/// [`crate::protocol::RpcResponse`] instead.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Request is missing a required field or is malformed
    #[error("{0}")]
    InvalidRequest(String),

    /// No session is registered under the given id
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session exists but has not completed the initialize handshake
    #[error("Session not initialized: {0}")]
    NotInitialized(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (binding, serving)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Create a new InvalidRequest error
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a new Config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
