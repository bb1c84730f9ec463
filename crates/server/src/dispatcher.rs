//! Message dispatch
//!
//! The dispatcher owns the per-session protocol rules:
//!
//! ```text
//! UNREGISTERED --register--> REGISTERED(initialized=false)
//! REGISTERED(initialized=false) --initialize--> REGISTERED(initialized=true)
//! REGISTERED(initialized=true) --any supported method--> REGISTERED(initialized=true)
//! ```
//!
//! Failures come in three tiers:
//!
//! - transport tier ([`ServerError`]): unknown session, uninitialized session
//! - protocol tier (envelope `error`): unsupported method `-32601`, invalid params `-32602`
//! - tool tier (envelope `result` with `isError: true`): the tool ran and failed

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, ServerError};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, ListToolsResult,
    McpRequest, RequestId, RpcError, RpcRequest, RpcResponse, ServerInfo,
};
use crate::session::SessionStore;
use crate::tools::{ToolError, ToolRegistry};

/// Routes decoded messages for registered sessions
#[derive(Debug, Clone)]
pub struct Dispatcher {
    sessions: Arc<SessionStore>,
    tools: Arc<ToolRegistry>,
    server_info: ServerInfo,
}

impl Dispatcher {
    pub fn new(sessions: Arc<SessionStore>, tools: Arc<ToolRegistry>, server_info: ServerInfo) -> Self {
        Self {
            sessions,
            tools,
            server_info,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Handle one message for `session_id`.
    ///
    /// `Err` is a transport-tier failure; everything else, including
    /// protocol errors, comes back as an envelope.
    pub async fn dispatch(&self, session_id: &str, message: RpcRequest) -> Result<RpcResponse> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| ServerError::SessionNotFound(session_id.to_string()))?;

        let RpcRequest { id, method, params, .. } = message;
        debug!(session_id, %method, "Dispatching message");

        let decoded = McpRequest::decode(&method, params);
        if !session.initialized && !matches!(decoded, Ok(McpRequest::Initialize(_))) {
            return Err(ServerError::NotInitialized(session_id.to_string()));
        }

        let request = match decoded {
            Ok(request) => request,
            Err(error) => {
                debug!(session_id, %method, code = error.code, "Rejected message");
                return Ok(RpcResponse::failure(id, error));
            }
        };

        match request {
            McpRequest::Initialize(params) => self.initialize(session_id, id, params),
            McpRequest::ListTools => self.list_tools(id),
            McpRequest::CallTool(params) => self.call_tool(session_id, id, params).await,
            McpRequest::Ping => Ok(RpcResponse::success(id, Value::Null)),
        }
    }

    fn initialize(
        &self,
        session_id: &str,
        id: Option<RequestId>,
        params: InitializeParams,
    ) -> Result<RpcResponse> {
        let session = self.sessions.initialize(session_id, params.client)?;
        info!(session_id, client = ?session.client_info, "Session initialized");

        success(
            id,
            &InitializeResult {
                server: self.server_info.clone(),
                capabilities: serde_json::json!({}),
            },
        )
    }

    fn list_tools(&self, id: Option<RequestId>) -> Result<RpcResponse> {
        success(
            id,
            &ListToolsResult {
                tools: self.tools.descriptors(),
            },
        )
    }

    async fn call_tool(
        &self,
        session_id: &str,
        id: Option<RequestId>,
        params: CallToolParams,
    ) -> Result<RpcResponse> {
        let Some(tool) = params.name.as_deref().and_then(|name| self.tools.get(name)) else {
            debug!(session_id, tool = ?params.name, "Unknown tool");
            return Ok(RpcResponse::failure(id, RpcError::method_not_supported()));
        };

        info!(session_id, tool = ?params.name, "Executing tool");
        match tool.call(params.arguments).await {
            Ok(result) => success(id, &result),
            Err(ToolError::InvalidParams(message)) => {
                Ok(RpcResponse::failure(id, RpcError::invalid_params(message)))
            }
            Err(ToolError::Fetch(message)) => success(id, &CallToolResult::error(message)),
        }
    }
}

fn success<T: Serialize>(id: Option<RequestId>, result: &T) -> Result<RpcResponse> {
    let value = serde_json::to_value(result)
        .map_err(|e| ServerError::internal(format!("Failed to encode result: {}", e)))?;
    Ok(RpcResponse::success(id, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND};
    use crate::tools::{FETCH_WEBSITE, WebsiteFetcher};
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticFetcher;

    #[async_trait]
    impl WebsiteFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> std::result::Result<String, ToolError> {
            if url.contains("unreachable") {
                Err(ToolError::Fetch("connection refused".to_string()))
            } else {
                Ok("hello".to_string())
            }
        }
    }

    fn dispatcher() -> Dispatcher {
        let tools = ToolRegistry::with_fetch_website(Arc::new(StaticFetcher), 4000);
        Dispatcher::new(
            Arc::new(SessionStore::new()),
            Arc::new(tools),
            ServerInfo {
                name: "direct-api-server".to_string(),
                version: "1.0.0".to_string(),
            },
        )
    }

    fn message(id: i64, method: &str, params: Value) -> RpcRequest {
        RpcRequest::new(id, method, params)
    }

    async fn initialized(dispatcher: &Dispatcher, session_id: &str) {
        dispatcher.sessions().register(session_id).unwrap();
        dispatcher
            .dispatch(session_id, message(0, "initialize", json!({"client": {"name": "t"}})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let dispatcher = dispatcher();
        let err = dispatcher
            .dispatch("ghost", message(1, "ping", Value::Null))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn every_method_but_initialize_requires_initialization() {
        let dispatcher = dispatcher();
        dispatcher.sessions().register("s").unwrap();

        for method in ["listTools", "callTool", "ping", "bogus", ""] {
            let err = dispatcher
                .dispatch("s", message(1, method, json!({})))
                .await
                .unwrap_err();
            assert!(matches!(err, ServerError::NotInitialized(_)), "method {method:?}");
        }
        assert!(!dispatcher.sessions().get("s").unwrap().initialized);
    }

    #[tokio::test]
    async fn initialize_returns_server_identity_and_is_idempotent() {
        let dispatcher = dispatcher();
        dispatcher.sessions().register("s").unwrap();

        let first = dispatcher
            .dispatch("s", message(1, "initialize", json!({"client": {"name": "a"}})))
            .await
            .unwrap();
        let second = dispatcher
            .dispatch("s", message(2, "initialize", json!({"client": {"name": "b"}})))
            .await
            .unwrap();

        assert_eq!(first.id, Some(RequestId::from(1)));
        assert_eq!(
            first.result.unwrap(),
            json!({"server": {"name": "direct-api-server", "version": "1.0.0"}, "capabilities": {}})
        );
        assert!(second.error.is_none());

        let session = dispatcher.sessions().get("s").unwrap();
        assert!(session.initialized);
        assert_eq!(session.client_info, Some(json!({"name": "b"})));
    }

    #[tokio::test]
    async fn list_tools_is_stable_across_calls() {
        let dispatcher = dispatcher();
        initialized(&dispatcher, "s").await;

        let before = dispatcher.dispatch("s", message(1, "listTools", json!({}))).await.unwrap();
        dispatcher
            .dispatch(
                "s",
                message(2, "callTool", json!({"name": FETCH_WEBSITE, "arguments": {"url": "https://a.test"}})),
            )
            .await
            .unwrap();
        let after = dispatcher.dispatch("s", message(3, "listTools", json!({}))).await.unwrap();

        let tools = before.result.clone().unwrap()["tools"].clone();
        assert_eq!(tools.as_array().unwrap().len(), 1);
        assert_eq!(tools[0]["name"], json!("fetchWebsite"));
        assert_eq!(before.result, after.result);
    }

    #[tokio::test]
    async fn call_tool_returns_content() {
        let dispatcher = dispatcher();
        initialized(&dispatcher, "s").await;

        let response = dispatcher
            .dispatch(
                "s",
                message(3, "callTool", json!({"name": "fetchWebsite", "arguments": {"url": "https://example.test"}})),
            )
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(
            result["content"][0]["text"],
            json!("Content from https://example.test:\n\nhello")
        );
        assert!(result.get("isError").is_none());
    }

    #[tokio::test]
    async fn call_tool_without_url_is_invalid_params() {
        let dispatcher = dispatcher();
        initialized(&dispatcher, "s").await;

        let response = dispatcher
            .dispatch("s", message(4, "callTool", json!({"name": "fetchWebsite", "arguments": {}})))
            .await
            .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.message, "Invalid params: url is required");
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn call_tool_fetch_failure_is_a_result_not_an_error() {
        let dispatcher = dispatcher();
        initialized(&dispatcher, "s").await;

        let response = dispatcher
            .dispatch(
                "s",
                message(5, "callTool", json!({"name": "fetchWebsite", "arguments": {"url": "http://unreachable.test"}})),
            )
            .await
            .unwrap();

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], json!(true));
        assert!(result["content"][0]["text"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn unknown_tool_and_unknown_method_are_not_supported() {
        let dispatcher = dispatcher();
        initialized(&dispatcher, "s").await;

        let unknown_tool = dispatcher
            .dispatch("s", message(6, "callTool", json!({"name": "rm -rf", "arguments": {}})))
            .await
            .unwrap();
        let unknown_method = dispatcher
            .dispatch("s", message(7, "resources/list", json!({})))
            .await
            .unwrap();

        assert_eq!(unknown_tool.error.unwrap().code, METHOD_NOT_FOUND);
        let error = unknown_method.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.message, "Method not supported");
        assert_eq!(unknown_method.id, Some(RequestId::from(7)));
    }

    #[tokio::test]
    async fn call_tool_without_a_string_name_is_not_supported() {
        let dispatcher = dispatcher();
        initialized(&dispatcher, "s").await;

        for params in [
            json!({"name": 5, "arguments": {"url": "u"}}),
            json!("fetchWebsite"),
            json!({"name": ["fetchWebsite"]}),
        ] {
            let response = dispatcher
                .dispatch("s", message(9, "callTool", params.clone()))
                .await
                .unwrap();
            let error = response.error.unwrap();
            assert_eq!(error.code, METHOD_NOT_FOUND, "{params}");
            assert_eq!(error.message, "Method not supported");
        }
    }

    #[tokio::test]
    async fn ping_returns_null_result() {
        let dispatcher = dispatcher();
        initialized(&dispatcher, "s").await;

        let response = dispatcher.dispatch("s", message(8, "ping", Value::Null)).await.unwrap();
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire, json!({"jsonrpc": "2.0", "id": 8, "result": null}));
    }
}
