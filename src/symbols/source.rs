//! Symbol table sources
//!
//! A source produces a [`SymbolMap`] once; the resolver caches the result.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Built-in mnemonic table, in listing order
pub const DEFAULT_SYMBOLS: &[(&str, &str)] = &[
    ("btc", "BTCUSDT"),
    ("bitcoin", "BTCUSDT"),
    ("eth", "ETHUSDT"),
    ("ethereum", "ETHUSDT"),
    ("sol", "SOLUSDT"),
    ("solana", "SOLUSDT"),
    ("doge", "DOGEUSDT"),
    ("shiba", "SHIBUSDT"),
    ("xrp", "XRPUSDT"),
    ("ada", "ADAUSDT"),
    ("dot", "DOTUSDT"),
    ("link", "LINKUSDT"),
    ("ltc", "LTCUSDT"),
    ("xlm", "XLMUSDT"),
    ("eos", "EOSUSDT"),
    ("bnb", "BNBUSDT"),
    ("matic", "MATICUSDT"),
    ("avax", "AVAXUSDT"),
    ("algo", "ALGOUSDT"),
    ("ftt", "FTTUSDT"),
    ("mana", "MANAUSDT"),
    ("uni", "UNIUSDT"),
    ("xmr", "XMRUSDT"),
    ("xem", "XEMUSDT"),
];

/// Header row of the tabular symbol map
pub const CSV_HEADER: &str = "crypto_name,symbol";

/// Immutable mnemonic → trading symbol table
///
/// Keeps source order for listing and a hash index for lookup.
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SymbolMap {
    /// Insert a mapping; the key is lower-cased, the symbol upper-cased.
    /// Returns false (and leaves the map unchanged) if the symbol is not `^[A-Z0-9]+$`.
    pub fn insert(&mut self, name: &str, symbol: &str) -> bool {
        let key = name.trim().to_lowercase();
        let symbol = symbol.trim().to_uppercase();
        if key.is_empty() || !is_valid_symbol(&symbol) {
            return false;
        }

        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = symbol,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, symbol));
            }
        }
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as CSV with the `crypto_name,symbol` header
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for (name, symbol) in self.iter() {
            out.push_str(name);
            out.push(',');
            out.push_str(symbol);
            out.push('\n');
        }
        out
    }

    pub fn builtin() -> Self {
        let mut map = Self::default();
        for (name, symbol) in DEFAULT_SYMBOLS {
            map.insert(name, symbol);
        }
        map
    }
}

/// Canonical trading symbols are non-empty uppercase alphanumerics
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Where the resolver's table comes from
pub trait SymbolSource: Send + Sync {
    fn load(&self) -> Result<SymbolMap>;

    /// Human-readable origin, used in log messages
    fn describe(&self) -> String;

    /// Whether `load` performs blocking I/O
    fn is_blocking(&self) -> bool {
        false
    }
}

/// The built-in in-code table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSymbols;

impl SymbolSource for StaticSymbols {
    fn load(&self) -> Result<SymbolMap> {
        Ok(SymbolMap::builtin())
    }

    fn describe(&self) -> String {
        "built-in symbol table".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SymbolRow {
    crypto_name: String,
    symbol: String,
}

/// A `crypto_name,symbol` CSV file, seeded with the built-in table if absent
#[derive(Debug, Clone)]
pub struct CsvSymbols {
    path: PathBuf,
}

impl CsvSymbols {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_defaults(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        for (name, symbol) in DEFAULT_SYMBOLS {
            writer.serialize(SymbolRow {
                crypto_name: name.to_string(),
                symbol: symbol.to_string(),
            })?;
        }
        writer.flush()?;

        tracing::info!(path = %self.path.display(), "Created default symbol map");
        Ok(())
    }
}

impl SymbolSource for CsvSymbols {
    fn is_blocking(&self) -> bool {
        true
    }

    fn load(&self) -> Result<SymbolMap> {
        if !self.path.exists() {
            self.write_defaults()?;
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut map = SymbolMap::default();
        for (line, row) in reader.deserialize::<SymbolRow>().enumerate() {
            let row = row.with_context(|| {
                format!("Malformed row {} in {}", line + 2, self.path.display())
            })?;
            if !map.insert(&row.crypto_name, &row.symbol) {
                tracing::warn!(
                    name = %row.crypto_name,
                    symbol = %row.symbol,
                    "Skipping invalid symbol map row"
                );
            }
        }

        Ok(map)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
