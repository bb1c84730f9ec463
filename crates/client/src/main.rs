use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use direct_api_client::{DirectClient, run_demo};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Parser)]
#[command(
    name = "direct-api-client",
    version,
    about = "Exercise the direct API server end to end"
)]
struct Args {
    /// Base URL of the server.
    #[arg(long, env = "SERVER_URL", default_value = "http://localhost:3002")]
    server_url: String,

    /// URL handed to the fetchWebsite tool.
    #[arg(long, default_value = "https://modelcontextprotocol.io")]
    url: String,

    /// Session id to register (defaults to a fresh UUID).
    #[arg(long)]
    session_id: Option<String>,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let session_id = args
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    println!("{}", "Starting direct MCP client...".bold());
    println!("Server URL: {}", args.server_url);
    println!("Session ID: {}", session_id);

    let client = DirectClient::new(
        &args.server_url,
        session_id,
        Duration::from_secs(args.request_timeout_secs),
    )?;

    match run_demo(&client, &args.url).await {
        Ok(report) => {
            println!(
                "{} {} v{}",
                "Connected to".green(),
                report.server.name,
                report.server.version
            );
            let names: Vec<&str> = report.tools.iter().map(|t| t.name.as_str()).collect();
            println!("Available tools: {}", names.join(", "));

            if report.tool_result.is_error == Some(true) {
                println!("{}", "Tool call reported an error".yellow());
            } else {
                println!("{}", "Tool call successful!".green());
            }
            if let Some(text) = report.tool_result.content.first().and_then(|c| c.as_text()) {
                println!("Content type: text");
                let preview: String = text.chars().take(PREVIEW_CHARS).collect();
                println!("First {} characters of content: {}...", PREVIEW_CHARS, preview);
            }

            println!("\n{}", "All operations completed successfully!".green().bold());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
