//! Typed HTTP client for the direct API server

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use direct_api_server::protocol::{
    CallToolResult, InitializeResult, ListToolsResult, RpcRequest, RpcResponse, ServerInfo,
    ToolDescriptor,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Body of `GET /status`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    pub sessions: usize,
    pub server: ServerInfo,
}

/// Body of a successful `POST /register`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub status: String,
    pub session_id: String,
    pub message: String,
}

/// Client bound to one server and one session id
#[derive(Debug)]
pub struct DirectClient {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
    next_id: AtomicI64,
}

impl DirectClient {
    pub fn new(base_url: impl Into<String>, session_id: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_id: session_id.into(),
            next_id: AtomicI64::new(1),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn status(&self) -> Result<ServerStatus> {
        let response = self.http.get(format!("{}/status", self.base_url)).send().await?;
        decode(response).await
    }

    pub async fn register(&self) -> Result<Registration> {
        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .json(&json!({ "sessionId": self.session_id }))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn initialize(&self, client_name: &str, client_version: &str) -> Result<InitializeResult> {
        let params = json!({
            "client": { "name": client_name, "version": client_version },
            "capabilities": {}
        });
        self.call("initialize", params).await
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let result: ListToolsResult = self.call("listTools", json!({})).await?;
        Ok(result.tools)
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult> {
        self.call("callTool", json!({ "name": name, "arguments": arguments }))
            .await
    }

    pub async fn ping(&self) -> Result<()> {
        self.rpc("ping", json!({})).await.map(|_| ())
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let result = self.rpc(method, params).await?;
        serde_json::from_value(result)
            .map_err(|e| ClientError::protocol(format!("Unexpected {} result: {}", method, e)))
    }

    /// Send one envelope and unwrap its `result`
    pub async fn rpc(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, method, session_id = %self.session_id, "Sending message");

        let response = self
            .http
            .post(format!("{}/api/message", self.base_url))
            .query(&[("sessionId", self.session_id.as_str())])
            .json(&RpcRequest::new(id, method, params))
            .send()
            .await?;
        let envelope: RpcResponse = decode(response).await?;

        if let Some(error) = envelope.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}
