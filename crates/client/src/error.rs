use thiserror::Error;

/// Client-side errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, timeout or body decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the server
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Envelope carried an `error` object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response did not have the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        Self::Protocol(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
