//! MCP tool handlers
//!
//! Each handler resolves the caller's asset name, queries the market data
//! client, and formats the result as text.

use crate::activity::{self, render_entries};
use crate::binance::TickerPrice;

use super::registry::HandlerFuture;
use super::server::BinanceServer;
use super::types::{RecentLogsParam, RollingWindowParam, SymbolParam};

/// Sentence returned by `get_price` and the crypto_price resource
pub fn price_sentence(ticker: &TickerPrice) -> String {
    format!("The current price of {} is {}", ticker.symbol, ticker.price)
}

pub fn get_price(server: &BinanceServer, params: SymbolParam) -> HandlerFuture<'_, String> {
    Box::pin(async move {
        let symbol = server.resolver.resolve_async(&params.symbol).await;
        tracing::info!(symbol = %symbol, "Getting price");

        let ticker = server.market.fetch_price(&symbol).await?;
        Ok(price_sentence(&ticker))
    })
}

pub fn get_price_24hr_change(
    server: &BinanceServer,
    params: SymbolParam,
) -> HandlerFuture<'_, String> {
    Box::pin(async move {
        let symbol = server.resolver.resolve_async(&params.symbol).await;
        tracing::info!(symbol = %symbol, "Getting 24h price change");

        let stats = server.market.fetch_24h_change(&symbol).await?;
        Ok(serde_json::to_string_pretty(&stats)?)
    })
}

pub fn get_rolling_windows_price(
    server: &BinanceServer,
    params: RollingWindowParam,
) -> HandlerFuture<'_, String> {
    Box::pin(async move {
        let symbol = server.resolver.resolve_async(&params.symbol).await;
        tracing::info!(symbol = %symbol, window = %params.window, "Getting rolling window price");

        let stats = server
            .market
            .fetch_rolling_window(&symbol, &params.window)
            .await?;
        Ok(serde_json::to_string_pretty(&stats)?)
    })
}

pub fn get_recent_logs(
    server: &BinanceServer,
    params: RecentLogsParam,
) -> HandlerFuture<'_, String> {
    Box::pin(async move {
        let entries = activity::read_recent(&server.activity, params.limit).await;
        Ok(render_entries(&entries))
    })
}
