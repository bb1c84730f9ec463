//! Server configuration
//!
//! [`ServerConfig`] is assembled by the binary from command-line flags and
//! environment variables, and handed to [`crate::api::AppState::new`].

use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::ServerInfo;

/// Default listen port (`PORT`)
pub const DEFAULT_PORT: u16 = 3002;

/// Default upper bound for an outbound website fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of characters of fetched text returned to the caller
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 4000;

/// Name the server reports in `initialize` and `/status`
pub const SERVER_NAME: &str = "direct-api-server";

/// Direct API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,

    /// Identity reported to clients
    pub server_info: ServerInfo,

    /// Timeout applied to every outbound fetch
    pub fetch_timeout: Duration,

    /// Maximum characters of fetched text before truncation
    pub max_content_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl ServerConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen address
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the reported server identity
    pub fn with_server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.server_info = ServerInfo {
            name: name.into(),
            version: version.into(),
        };
        self
    }

    /// Set the outbound fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the truncation limit for fetched text
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }
}
