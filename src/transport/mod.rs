//! MCP transport layer
//!
//! - Stdio: newline-delimited JSON-RPC over stdin/stdout (local clients)
//! - HTTP: JSON-RPC 2.0 over `POST /mcp` with session management

pub mod jsonrpc;
pub mod stdio;

#[cfg(feature = "http_transport")]
pub mod http;

use std::fmt;
use std::str::FromStr;

use crate::activity::LogBackend;

/// Transport mode selection for the MCP server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// Standard I/O transport (local MCP connections)
    #[default]
    Stdio,

    /// Streamable HTTP transport
    Http,
}

impl TransportMode {
    /// Activity log backend used when none is configured
    ///
    /// Stdio runs as a long-lived local process and keeps a durable log;
    /// HTTP keeps recent entries in memory for `get_recent_logs`.
    pub fn default_log_backend(&self) -> LogBackend {
        match self {
            TransportMode::Stdio => LogBackend::File,
            TransportMode::Http => LogBackend::Memory,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Stdio => write!(f, "stdio"),
            TransportMode::Http => write!(f, "http"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            other => Err(format!(
                "Invalid transport mode '{}'. Valid options: stdio, http",
                other
            )),
        }
    }
}
