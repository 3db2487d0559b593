//! HTTP request handlers for MCP JSON-RPC endpoints
//!
//! - POST /mcp: JSON-RPC endpoint. `initialize` opens a session and returns
//!   its id in the `Mcp-Session-Id` header; every other message must carry it.
//! - DELETE /mcp: close the session named by the header.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use super::error::{HttpTransportError, Result};
use super::session::{SessionError, SessionStore};
use crate::mcp::McpHandler;
use crate::transport::jsonrpc::JsonRpcRequest;

/// Session header (lowercase, as normalized by `http`)
pub const MCP_SESSION_ID_HEADER: &str = "mcp-session-id";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session store
    pub sessions: SessionStore,

    /// Protocol dispatcher
    pub mcp: McpHandler,
}

impl AppState {
    pub fn new(mcp: McpHandler, max_sessions: usize) -> Self {
        Self {
            sessions: SessionStore::new(max_sessions),
            mcp,
        }
    }
}

/// Main JSON-RPC endpoint handler
///
/// POST /mcp
/// Content-Type: application/json
/// Mcp-Session-Id: <uuid> (omitted for initialize)
pub async fn handle_jsonrpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let request = parse_request(&body)?;
    tracing::debug!(method = %request.method, "Received JSON-RPC request");

    if request.method == "initialize" {
        return handle_initialize(state, &headers, request).await;
    }

    let session_id = extract_session_id(&headers)?.ok_or(SessionError::InvalidSessionId)?;
    state.sessions.validate_session(session_id)?;

    match state.mcp.handle(request).await {
        Some(response) => Ok((StatusCode::OK, Json(response)).into_response()),
        None => Ok(StatusCode::ACCEPTED.into_response()),
    }
}

/// Session termination
///
/// DELETE /mcp
/// Mcp-Session-Id: <uuid>
pub async fn handle_delete_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    let session_id = extract_session_id(&headers)?.ok_or(SessionError::InvalidSessionId)?;

    if state.sessions.remove_session(session_id) {
        tracing::info!(session_id = %session_id, "Closed HTTP session");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(SessionError::SessionNotFound(session_id).into())
    }
}

/// Handle initialize method
///
/// A session is only created once the handshake succeeds.
async fn handle_initialize(
    state: AppState,
    headers: &HeaderMap,
    request: JsonRpcRequest,
) -> Result<Response> {
    let Some(mut response) = state.mcp.handle(request).await else {
        return Err(HttpTransportError::InvalidRequest(
            "initialize must carry an id".to_string(),
        ));
    };

    if response.error.is_some() {
        return Ok((StatusCode::OK, Json(response)).into_response());
    }

    let mut client_metadata = HashMap::new();
    if let Some(agent) = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        client_metadata.insert("user_agent".to_string(), agent.to_string());
    }
    let session_id = state.sessions.create_session(client_metadata)?;

    tracing::info!(
        session_id = %session_id,
        active = state.sessions.session_count(),
        max = state.sessions.max_sessions(),
        "Created new HTTP session"
    );

    if let Some(result) = response.result.as_mut() {
        result["sessionId"] = Value::String(session_id.to_string());
    }

    let header_value = HeaderValue::from_str(&session_id.to_string())
        .map_err(|e| HttpTransportError::Internal(e.to_string()))?;

    let mut http_response = (StatusCode::OK, Json(response)).into_response();
    http_response
        .headers_mut()
        .insert(HeaderName::from_static(MCP_SESSION_ID_HEADER), header_value);

    Ok(http_response)
}

fn parse_request(body: &[u8]) -> Result<JsonRpcRequest> {
    let value: Value = serde_json::from_slice(body)?;
    serde_json::from_value(value).map_err(|e| HttpTransportError::InvalidRequest(e.to_string()))
}

/// Extract session ID from Mcp-Session-Id header
fn extract_session_id(headers: &HeaderMap) -> Result<Option<Uuid>> {
    if let Some(header_value) = headers.get(MCP_SESSION_ID_HEADER) {
        let session_str = header_value
            .to_str()
            .map_err(|_| SessionError::InvalidSessionId)?;

        let session_id = Uuid::parse_str(session_str).map_err(|_| SessionError::InvalidSessionId)?;

        Ok(Some(session_id))
    } else {
        Ok(None)
    }
}
