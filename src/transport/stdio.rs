//! Stdio Transport for MCP Server
//!
//! Newline-delimited JSON-RPC over stdin/stdout for local MCP clients.
//! stdout carries protocol messages only; logging goes to stderr.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::mcp::McpHandler;

/// Serve requests from `reader` until end of input
///
/// Requests are handled in arrival order. Blank lines are ignored; a line
/// that is not JSON gets a parse error with a null id.
///
/// Framing is newline-delimited JSON-RPC handled here rather than through `rmcp`,
/// so stdio and HTTP dispatch through the same `McpHandler` and
/// report `ProviderError` with identical codes and `data` fields.
pub async fn serve_stdio<R, W>(handler: &McpHandler, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = handle_line(handler, line).await {
            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
    }

    tracing::debug!("stdin closed");
    Ok(())
}

async fn handle_line(handler: &McpHandler, line: &str) -> Option<JsonRpcResponse> {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed JSON on stdin");
            return Some(JsonRpcResponse::error(
                JsonRpcError::parse_error(),
                Value::Null,
            ));
        }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => handler.handle(request).await,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid JSON-RPC request on stdin");
            Some(JsonRpcResponse::error(JsonRpcError::invalid_request(), id))
        }
    }
}

/// Runs the MCP server with stdio transport
///
/// Returns when stdin closes or on Ctrl+C.
pub async fn run_stdio_server(handler: McpHandler) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("MCP server ready on stdio");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = serve_stdio(&handler, stdin, stdout) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal (Ctrl+C)");
        }
    }

    tracing::info!("MCP server shutdown complete");
    Ok(())
}
