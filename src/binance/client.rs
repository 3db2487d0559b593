//! Binance HTTP Client
//!
//! HTTP client wrapper for making requests to the Binance REST API.
//! Non-2xx responses are returned as [`ProviderError::Upstream`] carrying the
//! status code and raw body. No timeout or retry is applied at this layer.

use reqwest::Client;
use serde_json::Value;

use super::types::QueryKind;
use crate::config::DEFAULT_BASE_URL;
use crate::error::{ProviderError, Result};

/// Binance REST API HTTP client
#[derive(Clone, Debug)]
pub struct BinanceClient {
    /// HTTP client for making requests
    pub(crate) client: Client,
    /// Base URL for Binance API (default: https://api.binance.us)
    pub(crate) base_url: String,
}

impl BinanceClient {
    /// Creates a client against the default endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (e.g. a local stub)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("binance-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET against `path` and parse the JSON body
    ///
    /// # Errors
    /// * `Upstream` - non-2xx status; carries status and raw body
    /// * `Connection` - the request never produced a response
    /// * `Parse` - 2xx body is not valid JSON
    pub async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, ?query, "Binance request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status_code: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// GET /api/v3/ticker/price
    pub async fn get_ticker_price(&self, symbol: &str) -> Result<Value> {
        self.get_json(QueryKind::Price.path(), &[("symbol", symbol)])
            .await
    }

    /// GET /api/v3/ticker/24hr
    pub async fn get_24hr_ticker(&self, symbol: &str) -> Result<Value> {
        self.get_json(QueryKind::Change24h.path(), &[("symbol", symbol)])
            .await
    }

    /// GET /api/v3/ticker with a rolling `windowSize`
    pub async fn get_rolling_window_ticker(&self, symbol: &str, window: &str) -> Result<Value> {
        self.get_json(
            QueryKind::RollingWindow.path(),
            &[("symbol", symbol), ("windowSize", window)],
        )
        .await
    }
}
