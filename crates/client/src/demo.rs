//! The end-to-end walk through every endpoint

use direct_api_server::protocol::{CallToolResult, ServerInfo, ToolDescriptor};
use direct_api_server::tools::FETCH_WEBSITE;
use serde_json::json;
use tracing::info;

use crate::client::DirectClient;
use crate::error::{ClientError, Result};

/// Name the demo client reports during `initialize`
pub const CLIENT_NAME: &str = "direct-mcp-client";

/// Everything the demo learned along the way
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub server: ServerInfo,
    pub tools: Vec<ToolDescriptor>,
    pub tool_result: CallToolResult,
}

/// Check status, register, initialize, list tools, then fetch `url`
pub async fn run_demo(client: &DirectClient, url: &str) -> Result<DemoReport> {
    info!("Checking server status at {}", client.base_url());
    let status = client.status().await?;
    info!(sessions = status.sessions, server = %status.server.name, "Server status: {}", status.status);
    if status.status != "online" {
        return Err(ClientError::protocol("Server is not online"));
    }

    info!("Registering session {}", client.session_id());
    let registration = client.register().await?;
    info!("Registration response: {}", registration.message);

    info!("Initializing session");
    let init = client.initialize(CLIENT_NAME, env!("CARGO_PKG_VERSION")).await?;
    info!(server = %init.server.name, version = %init.server.version, "Initialized");

    info!("Listing available tools");
    let tools = client.list_tools().await?;
    for tool in &tools {
        info!(tool = %tool.name, "{}", tool.description);
    }

    info!("Calling {} tool with URL: {}", FETCH_WEBSITE, url);
    let tool_result = client.call_tool(FETCH_WEBSITE, json!({ "url": url })).await?;

    Ok(DemoReport {
        server: init.server,
        tools,
        tool_result,
    })
}
