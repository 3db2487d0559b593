//! Binance API Type Definitions
//!
//! Query and result types for the three supported ticker queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::window::WindowSize;

/// Which ticker endpoint a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Price,
    Change24h,
    RollingWindow,
}

impl QueryKind {
    /// Request path relative to the base URL
    pub fn path(self) -> &'static str {
        match self {
            QueryKind::Price => "/api/v3/ticker/price",
            QueryKind::Change24h => "/api/v3/ticker/24hr",
            QueryKind::RollingWindow => "/api/v3/ticker",
        }
    }
}

/// A single upstream query; built per invocation and discarded afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuery {
    pub symbol: String,
    pub kind: QueryKind,
    pub window: Option<WindowSize>,
}

impl MarketQuery {
    pub fn price(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            kind: QueryKind::Price,
            window: None,
        }
    }

    pub fn change_24h(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            kind: QueryKind::Change24h,
            window: None,
        }
    }

    pub fn rolling_window(symbol: impl Into<String>, window: WindowSize) -> Self {
        Self {
            symbol: symbol.into(),
            kind: QueryKind::RollingWindow,
            window: Some(window),
        }
    }
}

/// Response from /api/v3/ticker/price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerPrice {
    /// Trading pair symbol (e.g., "BTCUSDT")
    #[serde(default)]
    pub symbol: String,
    /// Current price as string to preserve precision
    pub price: String,
}

/// Response from /api/v3/ticker/24hr and /api/v3/ticker
///
/// The two change figures are typed; every other ticker field is passed
/// through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerStats {
    #[serde(default)]
    pub symbol: String,
    pub price_change: String,
    pub price_change_percent: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of a successful query
#[derive(Debug, Clone, PartialEq)]
pub enum MarketResult {
    Price(TickerPrice),
    Change24h(TickerStats),
    RollingWindow { window: WindowSize, stats: TickerStats },
}

impl MarketResult {
    pub fn symbol(&self) -> &str {
        match self {
            MarketResult::Price(ticker) => &ticker.symbol,
            MarketResult::Change24h(stats) => &stats.symbol,
            MarketResult::RollingWindow { stats, .. } => &stats.symbol,
        }
    }
}
