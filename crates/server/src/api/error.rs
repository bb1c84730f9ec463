//! Transport-tier error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, error};

use crate::error::ServerError;

impl ServerError {
    /// HTTP status and client-facing message for this error
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ServerError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ServerError::SessionNotFound(_) => (
                StatusCode::NOT_FOUND,
                "Session not found. Register first.".to_string(),
            ),
            ServerError::NotInitialized(_) => (
                StatusCode::BAD_REQUEST,
                "Session not initialized. Send initialize method first.".to_string(),
            ),
            ServerError::Config(_) | ServerError::Io(_) | ServerError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "Error handling request");
        } else {
            debug!(error = %self, %status, "Rejected request");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
