//! HTTP Server Configuration
//!
//! Configuration for the streamable HTTP MCP transport.

use std::net::SocketAddr;

/// HTTP server configuration
///
/// ## Environment Variables
///
/// - `HTTP_HOST`: Server bind address (default: 127.0.0.1)
/// - `HTTP_PORT`: Server port (default: 8897)
/// - `HTTP_MAX_SESSIONS`: Max concurrent MCP sessions (default: 50)
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Server bind address
    pub addr: SocketAddr,

    /// Maximum concurrent sessions
    pub max_sessions: usize,
}

impl HttpConfig {
    /// Load HTTP configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if any variable holds an unparsable value
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let host = std::env::var("HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8897".to_string())
            .parse()?;

        let max_sessions: usize = std::env::var("HTTP_MAX_SESSIONS")
            .unwrap_or_else(|_| "50".to_string())
            .parse()?;

        Ok(Self {
            addr: format!("{}:{}", host, port).parse()?,
            max_sessions,
        })
    }

    /// Replace the port, keeping the configured host
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // SAFETY: Test-only code, no other test in this crate touches these variables
        unsafe {
            std::env::remove_var("HTTP_HOST");
            std::env::remove_var("HTTP_PORT");
            std::env::remove_var("HTTP_MAX_SESSIONS");
        }

        let config = HttpConfig::from_env().expect("Failed to load config");

        assert_eq!(config.addr.to_string(), "127.0.0.1:8897");
        assert_eq!(config.max_sessions, 50);
    }

    #[test]
    fn test_with_port() {
        let config = HttpConfig {
            addr: "127.0.0.1:8897".parse().unwrap(),
            max_sessions: 50,
        }
        .with_port(9100);

        assert_eq!(config.addr.to_string(), "127.0.0.1:9100");
    }
}
