//! MCP Resources Implementation
//!
//! Read handlers for the symbol map, the activity log, and per-symbol prices.

use crate::activity::{self, render_entries};
use crate::error::ProviderError;

use super::registry::HandlerFuture;
use super::server::BinanceServer;
use super::tools::price_sentence;
use super::uri::UriParams;

pub const SYMBOL_MAP_URI: &str = "memory://symbol_map";
pub const ACTIVITY_LOG_URI: &str = "memory://activity_log";
pub const CRYPTO_PRICE_URI: &str = "resource://crypto_price/{symbol}";

/// Symbol mappings as `crypto_name,symbol` CSV
pub fn read_symbol_map(server: &BinanceServer, _params: UriParams) -> HandlerFuture<'_, String> {
    Box::pin(async move {
        server.resolver.warm().await;
        Ok(server.resolver.symbol_map().to_csv())
    })
}

/// Every retained activity entry, one per line
pub fn read_activity_log(server: &BinanceServer, _params: UriParams) -> HandlerFuture<'_, String> {
    Box::pin(async move {
        let entries = activity::read_all(&server.activity).await;
        Ok(render_entries(&entries))
    })
}

/// Current price for the `{symbol}` segment, e.g. `resource://crypto_price/btc`
pub fn read_crypto_price(server: &BinanceServer, params: UriParams) -> HandlerFuture<'_, String> {
    Box::pin(async move {
        let name = params
            .get("symbol")
            .ok_or_else(|| ProviderError::InvalidArgument("Missing symbol".to_string()))?;
        let symbol = server.resolver.resolve_async(name).await;

        let ticker = server.market.fetch_price(&symbol).await?;
        Ok(price_sentence(&ticker))
    })
}
