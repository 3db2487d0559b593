//! HTTP transport for MCP using Axum
//!
//! Streamable HTTP transport with JSON-RPC 2.0 protocol.
//! Session management with 30-minute timeout and a configurable session limit.

pub mod error;
pub mod handler;
pub mod session;

use axum::{http::HeaderName, routing::post, Router};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::HttpConfig;
use crate::mcp::McpHandler;
use handler::{handle_delete_session, handle_jsonrpc, AppState, MCP_SESSION_ID_HEADER};
use session::SessionStore;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Build the MCP router
///
/// # Endpoints
/// - POST /mcp: JSON-RPC 2.0 endpoint
/// - DELETE /mcp: close a session
///
/// # CORS
/// Allows all origins and exposes `Mcp-Session-Id` to browser clients.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(MCP_SESSION_ID_HEADER)]);

    Router::new()
        .route("/mcp", post(handle_jsonrpc).delete(handle_delete_session))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` is cancelled
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    tokio::spawn(sweep_sessions(state.sessions.clone(), shutdown.clone()));

    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("Shutting down HTTP server...");
        })
        .await
}

async fn sweep_sessions(sessions: SessionStore, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                let removed = sessions.cleanup_expired_sessions();
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired HTTP sessions");
                }
            }
        }
    }
}

/// Start HTTP server with MCP JSON-RPC endpoint
///
/// Runs until Ctrl+C.
pub async fn start_http_server(
    config: &HttpConfig,
    mcp: McpHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Initializing HTTP MCP server...");

    let state = AppState::new(mcp, config.max_sessions);
    let listener = TcpListener::bind(config.addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!("HTTP MCP server listening on {}", addr);
    tracing::info!("Endpoint: POST http://{}/mcp", addr);
    tracing::info!(
        max_sessions = config.max_sessions,
        timeout_minutes = session::SESSION_TIMEOUT_MINUTES,
        "Session management: Mcp-Session-Id header (UUID)"
    );

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received shutdown signal (Ctrl+C)");
                signal.cancel();
            }
            Err(err) => {
                tracing::error!("Failed to listen for shutdown signal: {}", err);
            }
        }
    });

    serve(listener, state, shutdown).await?;

    tracing::info!("Server stopped");
    Ok(())
}
