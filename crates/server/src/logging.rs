//! Subscriber setup for the server binary
//!
//! Request spans come from `TraceLayer`; with span events enabled their
//! close events carry the request latency.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{Result, ServerError};
use crate::protocol::ServerInfo;

/// Output format of the subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// How the server's logs are filtered and rendered
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base level; `RUST_LOG` directives are layered on top
    pub level: Level,
    pub format: LogFormat,
    /// Include source file and line on every event
    pub source_location: bool,
    /// Emit an event when a span closes (request timings)
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: Level::INFO,
            format: LogFormat::Pretty,
            source_location: false,
            span_events: false,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: Level) -> Self {
        LoggingConfig {
            level,
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_source_location(mut self, enabled: bool) -> Self {
        self.source_location = enabled;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    fn fmt_span(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(config.level.into());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_span_events(config.fmt_span())
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Pretty => subscriber.try_init(),
    };

    installed.map_err(|e| ServerError::config(format!("Failed to install subscriber: {}", e)))
}

pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level).map_err(|_| ServerError::config(format!("Invalid log level: {}", level)))
}

/// Startup line naming the server identity reported by `initialize`
pub fn log_welcome(server: &ServerInfo, config: &LoggingConfig) {
    tracing::info!(
        server = %server.name,
        version = %server.version,
        level = %config.level,
        format = ?config.format,
        "Starting {} v{}",
        server.name,
        server.version
    );
}
