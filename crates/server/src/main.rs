use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use direct_api_server::config::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_CONTENT_CHARS, DEFAULT_PORT};
use direct_api_server::logging::{LogFormat, LoggingConfig, log_welcome, parse_log_level, setup_logging};
use direct_api_server::{AppState, ServerConfig, serve};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "direct-api-server",
    version,
    about = "Session-scoped JSON-RPC tool server over plain HTTP"
)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Timeout for outbound website fetches, in seconds.
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    fetch_timeout_secs: u64,

    /// Characters of fetched text returned before truncation.
    #[arg(long, env = "MAX_CONTENT_CHARS", default_value_t = DEFAULT_MAX_CONTENT_CHARS)]
    max_content_chars: usize,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Include source file and line in log events.
    #[arg(long, env = "LOG_SOURCE_LOCATION", default_value_t = false)]
    log_source_location: bool,

    /// Log a timing event when each request span closes.
    #[arg(long, env = "LOG_SPAN_EVENTS", default_value_t = false)]
    log_span_events: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.json_logs { LogFormat::Json } else { LogFormat::Pretty };
    let logging = LoggingConfig::new(parse_log_level(&args.log_level)?)
        .with_format(format)
        .with_source_location(args.log_source_location)
        .with_span_events(args.log_span_events);
    setup_logging(&logging)?;

    let config = ServerConfig::new()
        .with_bind_addr(SocketAddr::new(args.host, args.port))
        .with_fetch_timeout(Duration::from_secs(args.fetch_timeout_secs))
        .with_max_content_chars(args.max_content_chars);
    log_welcome(&config.server_info, &logging);

    let state = AppState::new(&config)?;
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    info!(
        fetch_timeout_secs = args.fetch_timeout_secs,
        max_content_chars = args.max_content_chars,
        "Server configured"
    );

    serve(listener, state, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
