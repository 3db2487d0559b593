//! MCP Tool and Prompt Parameter Types
//!
//! Parameter structs double as the declared input schema (via schemars) and
//! the validator: unknown fields and wrong types are rejected on deserialize.

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

fn default_window() -> String {
    "1d".to_string()
}

fn default_log_limit() -> i64 {
    50
}

/// Accept any JSON integer, saturating at the `i64` range
///
/// Integers beyond `u64` arrive from serde_json as whole floats.
fn saturating_limit<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(D::Error::custom(format!(
            "invalid value: {}, expected an integer",
            number
        ))),
    }
}

/// Common parameter for symbol-based tools
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SymbolParam {
    /// Asset name or trading pair symbol (e.g., btc, ethereum, BTCUSDT)
    #[schemars(description = "Asset name or trading pair symbol (e.g., btc, ethereum, BTCUSDT)")]
    pub symbol: String,
}

/// Parameters for rolling-window statistics
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RollingWindowParam {
    #[schemars(description = "Asset name or trading pair symbol (e.g., btc, ethereum, BTCUSDT)")]
    pub symbol: String,

    /// Window size: 1m-59m, 1h-23h, or 1d-7d
    #[serde(default = "default_window")]
    #[schemars(description = "Window size: minutes 1m-59m, hours 1h-23h, days 1d-7d (default: 1d)")]
    pub window: String,
}

/// Parameters for get_recent_logs
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RecentLogsParam {
    /// Number of entries, clamped to 1-100
    #[serde(default = "default_log_limit", deserialize_with = "saturating_limit")]
    #[schemars(description = "Number of most recent entries to return (clamped to 1-100, default: 50)")]
    pub limit: i64,
}

/// Arguments for the crypto_summary prompt
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CryptoSummaryArgs {
    /// Comma-separated asset list (e.g., "btc, eth, sol")
    #[schemars(description = "Comma-separated list of crypto assets (e.g., btc, eth, sol)")]
    pub cryptos: String,
}

/// Prompts and tools that take no arguments
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoArgs {}
