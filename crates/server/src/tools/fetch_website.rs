//! The `fetchWebsite` tool

use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{info, warn};

use super::{Tool, ToolError};
use crate::error::{Result, ServerError};
use crate::protocol::{CallToolResult, ToolDescriptor};

/// Tool name as advertised by `listTools`
pub const FETCH_WEBSITE: &str = "fetchWebsite";

const TRUNCATION_MARKER: &str = "...(truncated)";

/// Outbound HTTP GET, returning the response body as text
#[async_trait]
pub trait WebsiteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<String, ToolError>;
}

/// [`WebsiteFetcher`] backed by a shared `reqwest` client with a request timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    fn describe(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            return format!("request timed out after {}s", self.timeout.as_secs_f64());
        }
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

#[async_trait]
impl WebsiteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, ToolError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Fetch(self.describe(&e)))?;
        response
            .text()
            .await
            .map_err(|e| ToolError::Fetch(self.describe(&e)))
    }
}

/// Split `text` after at most `max` characters; the flag reports whether anything was cut
pub fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Fetches a URL and returns its (truncated) text
pub struct FetchWebsiteTool {
    fetcher: Arc<dyn WebsiteFetcher>,
    max_content_chars: usize,
}

impl FetchWebsiteTool {
    pub fn new(fetcher: Arc<dyn WebsiteFetcher>, max_content_chars: usize) -> Self {
        Self {
            fetcher,
            max_content_chars,
        }
    }
}

#[async_trait]
impl Tool for FetchWebsiteTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: FETCH_WEBSITE.to_string(),
            description: "Fetches the content of a website by URL".to_string(),
            parameter_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "format": "uri",
                        "description": "The URL to fetch"
                    }
                },
                "required": ["url"]
            }),
        }
    }

    async fn call(&self, arguments: Value) -> std::result::Result<CallToolResult, ToolError> {
        let url = arguments
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ToolError::InvalidParams("Invalid params: url is required".to_string()))?;

        info!(%url, "Fetching website content");
        match self.fetcher.fetch(url).await {
            Ok(body) => {
                let (head, truncated) = truncate_chars(&body, self.max_content_chars);
                info!(%url, chars = body.chars().count(), truncated, "Fetched website content");
                let suffix = if truncated { TRUNCATION_MARKER } else { "" };
                Ok(CallToolResult::text(format!(
                    "Content from {}:\n\n{}{}",
                    url, head, suffix
                )))
            }
            Err(e) => {
                warn!(%url, error = %e, "Website fetch failed");
                Ok(CallToolResult::error(format!("Error fetching website: {}", e)))
            }
        }
    }
}
