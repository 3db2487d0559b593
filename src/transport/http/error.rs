//! HTTP transport error handling
//!
//! Transport-level failures (sessions, unparseable bodies) answered before a
//! request reaches the MCP dispatcher. Method-level errors travel inside a
//! normal `200 OK` JSON-RPC response instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::session::SessionError;
use crate::transport::jsonrpc::{JsonRpcError, JsonRpcResponse};

/// HTTP transport errors
#[derive(Debug, thiserror::Error)]
pub enum HttpTransportError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid JSON-RPC request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl HttpTransportError {
    /// Convert to JSON-RPC error code
    pub fn to_jsonrpc_error(&self) -> JsonRpcError {
        match self {
            HttpTransportError::Session(SessionError::SessionNotFound(_))
            | HttpTransportError::Session(SessionError::InvalidSessionId) => {
                JsonRpcError::session_missing()
            }
            HttpTransportError::Session(SessionError::SessionExpired(_)) => {
                JsonRpcError::session_invalid()
            }
            HttpTransportError::Session(SessionError::SessionLimitExceeded(max)) => {
                JsonRpcError::session_limit_exceeded(*max)
            }
            HttpTransportError::JsonParse(_) => JsonRpcError::parse_error(),
            HttpTransportError::InvalidRequest(msg) => JsonRpcError::new(
                JsonRpcError::INVALID_REQUEST,
                format!("Invalid Request: {}", msg),
            ),
            HttpTransportError::Internal(msg) => JsonRpcError::new(
                JsonRpcError::INTERNAL_ERROR,
                format!("Internal error: {}", msg),
            ),
        }
    }

    /// Get HTTP status code for error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpTransportError::Session(SessionError::SessionLimitExceeded(_)) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            HttpTransportError::Session(_) => StatusCode::UNAUTHORIZED,
            HttpTransportError::JsonParse(_) => StatusCode::BAD_REQUEST,
            HttpTransportError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            HttpTransportError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpTransportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(status = %status, error = %self, "Rejected HTTP request");

        let response = JsonRpcResponse::error(self.to_jsonrpc_error(), serde_json::Value::Null);
        (status, Json(response)).into_response()
    }
}

/// Result type for HTTP transport operations
pub type Result<T> = std::result::Result<T, HttpTransportError>;
