use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Html;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::AppState;
use super::home::HOME_PAGE;
use crate::error::{Result, ServerError};
use crate::protocol::{RpcRequest, RpcResponse, ServerInfo};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub sessions: usize,
    pub server: ServerInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub status: &'static str,
    pub session_id: String,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    pub session_id: Option<String>,
}

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let dispatcher = state.dispatcher();
    Json(StatusResponse {
        status: "online",
        sessions: dispatcher.sessions().count(),
        server: dispatcher.server_info().clone(),
    })
}

pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<Json<RegisterResponse>> {
    // A body that is not a JSON object is treated the same as one without `sessionId`
    let request: RegisterRequest = serde_json::from_slice(&body).unwrap_or_default();
    let session_id = request.session_id.unwrap_or_default();

    let session = state.dispatcher().sessions().register(&session_id)?;
    info!(session_id = %session.id, "Registered new session");

    Ok(Json(RegisterResponse {
        status: "success",
        session_id: session.id,
        message: "Session registered successfully",
    }))
}

pub async fn message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Result<Json<RpcResponse>> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|_| ServerError::invalid_request("Invalid JSON body"))?;

    let session_id = query
        .session_id
        .filter(|id| !id.is_empty())
        .or_else(|| {
            body.get("sessionId")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        })
        .ok_or_else(|| ServerError::invalid_request("Missing sessionId parameter"))?;

    // Unknown sessions are reported before the envelope shape is checked
    if state.dispatcher().sessions().get(&session_id).is_none() {
        return Err(ServerError::SessionNotFound(session_id));
    }

    let message: RpcRequest = serde_json::from_value(body)
        .map_err(|_| ServerError::invalid_request("Invalid JSON-RPC message"))?;

    let response = state.dispatcher().dispatch(&session_id, message).await?;
    Ok(Json(response))
}
