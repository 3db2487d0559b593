//! MCP prompt templates
//!
//! Pure text generation, no I/O.

use crate::symbols::DEFAULT_SYMBOLS;

use super::types::{CryptoSummaryArgs, NoArgs};

/// "For btc/bitcoin, the symbol is BTCUSDT." lines from the built-in table
fn symbol_guide() -> String {
    let mut groups: Vec<(Vec<&str>, &str)> = Vec::new();
    for (name, symbol) in DEFAULT_SYMBOLS {
        match groups.iter_mut().find(|(_, s)| *s == *symbol) {
            Some((names, _)) => names.push(*name),
            None => groups.push((vec![*name], *symbol)),
        }
    }

    groups
        .iter()
        .map(|(names, symbol)| format!("For {}, the symbol is {}.", names.join("/"), symbol))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn executive_summary(_args: NoArgs) -> String {
    r#"Get the prices of the following crypto assets: btc, eth

Provide me with an executive summary including the
two-sentence summary of the crypto asset, the current price,
the price change in the last 24 hours, and the percentage change
in the last 24 hours.

When using the get_price and get_price_24hr_change tools,
use the symbol as the argument.

Symbols: For bitcoin/btc, the symbol is "BTCUSDT".
Symbols: For ethereum/eth, the symbol is "ETHUSDT"."#
        .to_string()
}

pub fn crypto_summary(args: CryptoSummaryArgs) -> String {
    let assets = args
        .cryptos
        .split(',')
        .map(str::trim)
        .filter(|asset| !asset.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Get the current price of the following crypto assets:
{}

If multiple assets are provided (separated by commas), get data for each one.
Provide a summary including the current price and price change in the last 24 hours for each asset.

When using the get_price and get_price_24hr_change tools, use the symbol as the argument.

Symbol mappings:
{}

Format the output as a clean summary for each asset."#,
        assets,
        symbol_guide()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_guide_groups_aliases() {
        let guide = symbol_guide();
        assert!(guide.contains("For btc/bitcoin, the symbol is BTCUSDT."));
        assert!(guide.contains("For doge, the symbol is DOGEUSDT."));
        assert_eq!(guide.lines().count(), 21);
    }

    #[test]
    fn test_crypto_summary_normalizes_list() {
        let text = crypto_summary(CryptoSummaryArgs {
            cryptos: " btc,eth ,, sol ".to_string(),
        });
        assert!(text.starts_with("Get the current price of the following crypto assets:\nbtc, eth, sol\n"));
    }

    #[test]
    fn test_executive_summary_fixed_assets() {
        let text = executive_summary(NoArgs::default());
        assert!(text.contains("btc, eth"));
        assert!(text.contains("BTCUSDT"));
        assert!(text.contains("ETHUSDT"));
    }
}
