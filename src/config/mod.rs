//! Configuration Management
//!
//! Process-wide settings loaded from environment variables at startup.

#[cfg(feature = "http_transport")]
pub mod http;

use std::path::{Path, PathBuf};

use crate::activity::LogBackend;

#[cfg(feature = "http_transport")]
pub use http::HttpConfig;

/// Default upstream REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.binance.us";

/// Default base directory for the symbol table and the durable activity log
pub const DEFAULT_DATA_DIR: &str = "./data";

pub const SYMBOL_MAP_FILE: &str = "symbol_map.csv";
pub const ACTIVITY_LOG_FILE: &str = "activity.log";

/// Core provider configuration
///
/// ## Environment Variables
///
/// - `BINANCE_BASE_URL`: Upstream REST base URL (default: https://api.binance.us)
/// - `BINANCE_MCP_DATA_DIR`: Directory for symbol_map.csv and activity.log (default: ./data)
/// - `BINANCE_MCP_LOG_BACKEND`: `file` or `memory` (default: chosen by transport mode)
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub data_dir: PathBuf,
    pub log_backend: Option<LogBackend>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let base_url = std::env::var("BINANCE_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let data_dir = std::env::var("BINANCE_MCP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let log_backend = match std::env::var("BINANCE_MCP_LOG_BACKEND") {
            Ok(value) => Some(value.parse()?),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            data_dir,
            log_backend,
        })
    }

    pub fn symbol_map_path(&self) -> PathBuf {
        self.data_dir.join(SYMBOL_MAP_FILE)
    }

    pub fn activity_log_path(&self) -> PathBuf {
        self.data_dir.join(ACTIVITY_LOG_FILE)
    }

    /// Configuration rooted at an explicit directory and upstream URL
    pub fn with_paths(base_url: impl Into<String>, data_dir: impl AsRef<Path>) -> Self {
        Self {
            base_url: base_url.into(),
            data_dir: data_dir.as_ref().to_path_buf(),
            log_backend: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_paths(DEFAULT_BASE_URL, DEFAULT_DATA_DIR)
    }
}
