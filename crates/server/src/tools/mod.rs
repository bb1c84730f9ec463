//! Tool registry
//!
//! Tools are registered once at startup and looked up by name when a
//! `callTool` request arrives. The registry is immutable after it is handed
//! to [`crate::dispatcher::Dispatcher`].

mod fetch_website;

pub use fetch_website::{FETCH_WEBSITE, FetchWebsiteTool, HttpFetcher, WebsiteFetcher, truncate_chars};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::{CallToolResult, ToolDescriptor};

/// Tool-layer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Arguments are missing or malformed; surfaces as `-32602`
    #[error("{0}")]
    InvalidParams(String),

    /// The outbound fetch failed; surfaces as an `isError` result
    #[error("{0}")]
    Fetch(String),
}

/// An invocable tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static metadata advertised by `listTools`
    fn descriptor(&self) -> ToolDescriptor;

    /// Run the tool.
    ///
    /// Execution failures should be reported as an `Ok` result marked
    /// `is_error`; `Err` is reserved for argument problems.
    async fn call(&self, arguments: Value) -> Result<CallToolResult, ToolError>;
}

/// Name-indexed set of tools, in registration order
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<(ToolDescriptor, Arc<dyn Tool>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding the built-in `fetchWebsite` tool
    pub fn with_fetch_website(fetcher: Arc<dyn WebsiteFetcher>, max_content_chars: usize) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FetchWebsiteTool::new(fetcher, max_content_chars)));
        registry
    }

    /// Add a tool, replacing any tool already registered under the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let descriptor = tool.descriptor();
        match self.tools.iter_mut().find(|(d, _)| d.name == descriptor.name) {
            Some(slot) => *slot = (descriptor, tool),
            None => self.tools.push((descriptor, tool)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|(d, _)| d.name == name)
            .map(|(_, tool)| tool.clone())
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|(d, _)| d.clone()).collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|(d, _)| &d.name))
            .finish()
    }
}
