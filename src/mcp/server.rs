//! MCP Server State
//!
//! Holds the long-lived collaborators every handler works with.

use std::sync::Arc;

use crate::activity::ActivityLog;
use crate::binance::{BinanceClient, MarketDataClient};
use crate::config::Config;
use crate::error::Result;
use crate::symbols::{CsvSymbols, StaticSymbols, SymbolResolver};
use crate::transport::TransportMode;

/// Shared server state
///
/// Built once at startup and handed by reference to every tool, resource,
/// and prompt handler.
#[derive(Clone)]
pub struct BinanceServer {
    /// Name → trading symbol resolution (loaded at most once)
    pub resolver: Arc<SymbolResolver>,

    /// Upstream ticker queries with mandatory activity logging
    pub market: MarketDataClient,

    /// Activity log backend
    pub activity: Arc<dyn ActivityLog>,
}

impl BinanceServer {
    pub fn new(
        resolver: Arc<SymbolResolver>,
        market: MarketDataClient,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            resolver,
            market,
            activity,
        }
    }

    /// Build the server for a transport mode
    ///
    /// - stdio: durable file log, CSV symbol table under the data directory
    /// - http: in-memory ring buffer, built-in symbol table
    ///
    /// `BINANCE_MCP_LOG_BACKEND` overrides the log backend for either mode.
    pub fn from_config(config: &Config, mode: TransportMode) -> Result<Self> {
        let backend = config
            .log_backend
            .unwrap_or_else(|| mode.default_log_backend());
        let activity = backend.build(config.activity_log_path());

        let resolver = match mode {
            TransportMode::Stdio => {
                SymbolResolver::new(CsvSymbols::new(config.symbol_map_path()), activity.clone())
            }
            TransportMode::Http => SymbolResolver::new(StaticSymbols, activity.clone()),
        };

        let client = BinanceClient::with_base_url(&config.base_url)?;
        let market = MarketDataClient::new(client, activity.clone());

        tracing::info!(
            mode = %mode,
            log_backend = ?backend,
            base_url = %config.base_url,
            "Initialized Binance server"
        );

        Ok(Self::new(Arc::new(resolver), market, activity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stdio_mode_uses_csv_and_file_log() {
        let dir = tempdir().unwrap();
        let config = Config::with_paths("http://127.0.0.1:9", dir.path());

        let server = BinanceServer::from_config(&config, TransportMode::Stdio).unwrap();
        assert_eq!(server.resolver.resolve("btc"), "BTCUSDT");
        assert!(config.symbol_map_path().exists());

        server.activity.info("hello".to_string());
        assert!(config.activity_log_path().exists());
    }

    #[test]
    fn test_http_mode_uses_memory_log() {
        let dir = tempdir().unwrap();
        let config = Config::with_paths("http://127.0.0.1:9", dir.path());

        let server = BinanceServer::from_config(&config, TransportMode::Http).unwrap();
        server.activity.info("hello".to_string());
        assert_eq!(server.activity.read_all().len(), 1);
        assert!(!config.activity_log_path().exists());
        assert!(!config.symbol_map_path().exists());
    }
}
