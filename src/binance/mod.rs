//! Binance API Client
//!
//! HTTP client for the upstream ticker endpoints plus the logging
//! market-data client built on top of it.

pub mod client;
pub mod market;
pub mod types;
pub mod window;

// Re-export commonly used types
pub use client::BinanceClient;
pub use market::MarketDataClient;
pub use types::{MarketQuery, MarketResult, QueryKind, TickerPrice, TickerStats};
pub use window::WindowSize;
