//! Market data client
//!
//! Runs ticker queries through [`BinanceClient`] and records exactly one
//! activity entry per executed query. Window validation happens before any
//! request is issued and does not touch the activity log.

use std::sync::Arc;

use serde_json::Value;

use super::client::BinanceClient;
use super::types::{MarketQuery, MarketResult, QueryKind, TickerPrice, TickerStats};
use super::window::WindowSize;
use crate::activity::{self, ActivityLog, LogLevel};
use crate::error::{ProviderError, Result};

#[derive(Clone)]
pub struct MarketDataClient {
    client: BinanceClient,
    activity: Arc<dyn ActivityLog>,
}

impl MarketDataClient {
    pub fn new(client: BinanceClient, activity: Arc<dyn ActivityLog>) -> Self {
        Self { client, activity }
    }

    /// Latest price for a resolved symbol
    pub async fn fetch_price(&self, symbol: &str) -> Result<TickerPrice> {
        match self.execute(&MarketQuery::price(symbol)).await? {
            MarketResult::Price(ticker) => Ok(ticker),
            other => Err(unexpected(QueryKind::Price, &other)),
        }
    }

    /// 24-hour ticker statistics for a resolved symbol
    pub async fn fetch_24h_change(&self, symbol: &str) -> Result<TickerStats> {
        match self.execute(&MarketQuery::change_24h(symbol)).await? {
            MarketResult::Change24h(stats) => Ok(stats),
            other => Err(unexpected(QueryKind::Change24h, &other)),
        }
    }

    /// Rolling-window ticker statistics; `window` is validated locally first
    pub async fn fetch_rolling_window(&self, symbol: &str, window: &str) -> Result<TickerStats> {
        let window: WindowSize = window.parse()?;
        match self
            .execute(&MarketQuery::rolling_window(symbol, window))
            .await?
        {
            MarketResult::RollingWindow { stats, .. } => Ok(stats),
            other => Err(unexpected(QueryKind::RollingWindow, &other)),
        }
    }

    /// Issue the query, interpret the response, and log the outcome
    pub async fn execute(&self, query: &MarketQuery) -> Result<MarketResult> {
        let outcome = match self.fetch(query).await {
            Ok(payload) => parse_result(query, payload),
            Err(e) => Err(e),
        };

        let (level, message) = match &outcome {
            Ok(result) => (LogLevel::Info, success_message(query, result)),
            Err(e) => (LogLevel::Error, failure_message(query, e)),
        };
        activity::record(&self.activity, level, message).await;

        outcome
    }

    async fn fetch(&self, query: &MarketQuery) -> Result<Value> {
        match query.kind {
            QueryKind::Price => self.client.get_ticker_price(&query.symbol).await,
            QueryKind::Change24h => self.client.get_24hr_ticker(&query.symbol).await,
            QueryKind::RollingWindow => {
                let window = query.window.unwrap_or_default().to_string();
                self.client
                    .get_rolling_window_ticker(&query.symbol, &window)
                    .await
            }
        }
    }
}

fn parse_result(query: &MarketQuery, payload: Value) -> Result<MarketResult> {
    match query.kind {
        QueryKind::Price => {
            let mut ticker: TickerPrice = serde_json::from_value(payload)?;
            if ticker.symbol.is_empty() {
                ticker.symbol = query.symbol.clone();
            }
            Ok(MarketResult::Price(ticker))
        }
        QueryKind::Change24h => Ok(MarketResult::Change24h(parse_stats(query, payload)?)),
        QueryKind::RollingWindow => Ok(MarketResult::RollingWindow {
            window: query.window.unwrap_or_default(),
            stats: parse_stats(query, payload)?,
        }),
    }
}

fn parse_stats(query: &MarketQuery, payload: Value) -> Result<TickerStats> {
    let mut stats: TickerStats = serde_json::from_value(payload)?;
    if stats.symbol.is_empty() {
        stats.symbol = query.symbol.clone();
    }
    Ok(stats)
}

fn success_message(query: &MarketQuery, result: &MarketResult) -> String {
    match result {
        MarketResult::Price(ticker) => format!(
            "Successfully got the current price for {}: {}",
            query.symbol, ticker.price
        ),
        MarketResult::Change24h(stats) => format!(
            "Successfully got the price change for {}: {} ({}%)",
            query.symbol, stats.price_change, stats.price_change_percent
        ),
        MarketResult::RollingWindow { window, stats } => format!(
            "Successfully got the price change for {} in the window {}: {} ({}%)",
            query.symbol, window, stats.price_change, stats.price_change_percent
        ),
    }
}

fn failure_message(query: &MarketQuery, err: &ProviderError) -> String {
    let subject = match query.kind {
        QueryKind::Price => format!("Error getting price for {}", query.symbol),
        QueryKind::Change24h => format!("Error getting price change for {}", query.symbol),
        QueryKind::RollingWindow => format!(
            "Error getting the price change for {} in the window {}",
            query.symbol,
            query.window.unwrap_or_default()
        ),
    };

    match err {
        ProviderError::Upstream { status_code, body } => {
            format!("{}: {} {}", subject, status_code, body)
        }
        other => format!("{}: {}", subject, other),
    }
}

fn unexpected(kind: QueryKind, result: &MarketResult) -> ProviderError {
    ProviderError::Internal(format!(
        "{:?} query produced a mismatched result for {}",
        kind,
        result.symbol()
    ))
}
