//! JSON-RPC envelope and payload types
//!
//! Every message on `/api/message` is an [`RpcRequest`]. Its `method` string
//! is decoded into an [`McpRequest`] before routing, so the set of supported
//! methods is a closed enum rather than a chain of string compares.
//!
//! ```rust
//! use direct_api_server::protocol::{McpRequest, RpcRequest};
//!
//! let request: RpcRequest = serde_json::from_str(
//!     r#"{"jsonrpc":"2.0","id":1,"method":"ping","params":{}}"#,
//! ).unwrap();
//! let decoded = McpRequest::decode(&request.method, request.params).unwrap();
//! assert!(matches!(decoded, McpRequest::Ping));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version echoed on every response
pub const JSONRPC_VERSION: &str = "2.0";

/// `-32601`: the method (or tool) does not exist
pub const METHOD_NOT_FOUND: i64 = -32601;

/// `-32602`: the method exists but its parameters are unusable
pub const INVALID_PARAMS: i64 = -32602;

/// Request identifier, echoed unchanged on the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(serde_json::Number),
    String(String),
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        RequestId::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

/// Incoming envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Absent or `null` ids are echoed as `null`
    #[serde(default)]
    pub id: Option<RequestId>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }
}

/// Outgoing envelope: exactly one of `result` or `error` is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<RequestId>, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Protocol-tier error carried inside the envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_supported() -> Self {
        Self::new(METHOD_NOT_FOUND, "Method not supported")
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

/// A decoded request, one variant per supported method
#[derive(Debug, Clone)]
pub enum McpRequest {
    Initialize(InitializeParams),
    ListTools,
    CallTool(CallToolParams),
    Ping,
}

impl McpRequest {
    /// Decode a method name and its raw params.
    ///
    /// Unknown methods decode to a `-32601` error. Known methods never fail
    /// to decode: unusable `initialize` params are treated as empty, and a
    /// `callTool` name that is not a string is treated as absent.
    pub fn decode(method: &str, params: Value) -> Result<Self, RpcError> {
        match method {
            "initialize" => Ok(McpRequest::Initialize(
                serde_json::from_value(params).unwrap_or_default(),
            )),
            "listTools" => Ok(McpRequest::ListTools),
            "callTool" => Ok(McpRequest::CallTool(CallToolParams::from_raw(&params))),
            "ping" => Ok(McpRequest::Ping),
            _ => Err(RpcError::method_not_supported()),
        }
    }
}

/// Server identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// `initialize` params; `client` is stored verbatim, never validated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitializeParams {
    #[serde(default)]
    pub client: Option<Value>,
    #[serde(default)]
    pub capabilities: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    pub server: ServerInfo,
    pub capabilities: Value,
}

/// Static description of one invocable tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "parameters")]
    pub parameter_schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Clone, Default)]
pub struct CallToolParams {
    pub name: Option<String>,
    pub arguments: Value,
}

impl CallToolParams {
    /// Pick `name` and `arguments` out of arbitrary params. Shapes that do
    /// not carry a string name leave it `None`, which routes to `-32601`.
    pub fn from_raw(params: &Value) -> Self {
        Self {
            name: params.get("name").and_then(Value::as_str).map(str::to_string),
            arguments: params.get("arguments").cloned().unwrap_or(Value::Null),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
        }
    }
}

/// Tool output. `is_error` marks a tool-tier failure; it is omitted on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_id_keeps_its_json_type() {
        let numeric: RpcRequest = serde_json::from_value(json!({"id": 7, "method": "ping"})).unwrap();
        let text: RpcRequest = serde_json::from_value(json!({"id": "a-1", "method": "ping"})).unwrap();

        let numeric = serde_json::to_value(RpcResponse::success(numeric.id, Value::Null)).unwrap();
        let text = serde_json::to_value(RpcResponse::success(text.id, Value::Null)).unwrap();

        assert_eq!(numeric["id"], json!(7));
        assert_eq!(text["id"], json!("a-1"));
    }

    #[test]
    fn missing_id_is_echoed_as_null() {
        let request: RpcRequest = serde_json::from_value(json!({"method": "ping"})).unwrap();
        let response = serde_json::to_value(RpcResponse::success(request.id, Value::Null)).unwrap();
        assert!(response.get("id").unwrap().is_null());
        assert!(response.get("result").unwrap().is_null());
        assert!(response.get("error").is_none());
    }

    #[test]
    fn unknown_method_decodes_to_method_not_found() {
        let err = McpRequest::decode("resources/list", json!({})).unwrap_err();
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not supported");
    }

    #[test]
    fn initialize_tolerates_any_params() {
        let decoded = McpRequest::decode("initialize", json!("not an object")).unwrap();
        match decoded {
            McpRequest::Initialize(params) => assert!(params.client.is_none()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn call_tool_with_odd_params_decodes_without_a_name() {
        for params in [
            json!([1, 2]),
            json!("fetchWebsite"),
            json!({"name": 5, "arguments": {"url": "u"}}),
            json!({"name": ["fetchWebsite"]}),
        ] {
            match McpRequest::decode("callTool", params.clone()) {
                Ok(McpRequest::CallTool(decoded)) => assert!(decoded.name.is_none(), "{params}"),
                other => panic!("unexpected {:?} for {}", other, params),
            }
        }
    }

    #[test]
    fn call_tool_without_params_has_no_name() {
        match McpRequest::decode("callTool", Value::Null).unwrap() {
            McpRequest::CallTool(params) => {
                assert!(params.name.is_none());
                assert!(params.arguments.is_null());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn tool_result_wire_shape() {
        let ok = serde_json::to_value(CallToolResult::text("hi")).unwrap();
        assert_eq!(ok, json!({"content": [{"type": "text", "text": "hi"}]}));

        let failed = serde_json::to_value(CallToolResult::error("boom")).unwrap();
        assert_eq!(failed["isError"], json!(true));
    }

    #[test]
    fn descriptor_schema_serializes_as_parameters() {
        let descriptor = ToolDescriptor {
            name: "t".into(),
            description: "d".into(),
            parameter_schema: json!({"type": "object"}),
        };
        let value = serde_json::to_value(descriptor).unwrap();
        assert_eq!(value["parameters"], json!({"type": "object"}));
    }
}
