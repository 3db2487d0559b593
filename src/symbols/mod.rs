//! Symbol resolution
//!
//! Maps free-form asset names ("btc", "Bitcoin") to trading symbols
//! ("BTCUSDT"). Resolution is total: unknown names resolve to their
//! upper-cased input.

pub mod source;

use std::sync::{Arc, OnceLock};

use crate::activity::ActivityLog;

pub use source::{CsvSymbols, StaticSymbols, SymbolMap, SymbolSource, DEFAULT_SYMBOLS};

/// Resolver with a lazily loaded, process-lifetime symbol table
///
/// The table is loaded on first use. Concurrent first callers block on the
/// same initialization, so the source is read at most once. A failed load
/// degrades to an empty table and is recorded in the activity log.
pub struct SymbolResolver {
    source: Box<dyn SymbolSource>,
    table: OnceLock<SymbolMap>,
    activity: Arc<dyn ActivityLog>,
}

impl SymbolResolver {
    pub fn new(source: impl SymbolSource + 'static, activity: Arc<dyn ActivityLog>) -> Self {
        Self {
            source: Box::new(source),
            table: OnceLock::new(),
            activity,
        }
    }

    /// Resolver over the built-in table
    pub fn builtin(activity: Arc<dyn ActivityLog>) -> Self {
        Self::new(StaticSymbols, activity)
    }

    /// Resolve a name to a trading symbol. Never fails.
    pub fn resolve(&self, name: &str) -> String {
        let key = name.to_lowercase();
        match self.symbol_map().get(&key) {
            Some(symbol) => symbol.to_string(),
            None => name.to_uppercase(),
        }
    }

    /// Resolve from async code
    ///
    /// A first load from a blocking source runs on the blocking pool.
    pub async fn resolve_async(self: &Arc<Self>, name: &str) -> String {
        self.warm().await;
        self.resolve(name)
    }

    /// Make sure the table is loaded without blocking a runtime worker
    pub async fn warm(self: &Arc<Self>) {
        if self.is_loaded() || !self.source.is_blocking() {
            return;
        }

        let resolver = Arc::clone(self);
        let loaded = tokio::task::spawn_blocking(move || {
            resolver.symbol_map();
        })
        .await;
        if let Err(e) = loaded {
            tracing::warn!("Symbol map load task failed: {}", e);
        }
    }

    /// The loaded table (empty if the source failed)
    pub fn symbol_map(&self) -> &SymbolMap {
        self.table.get_or_init(|| self.load())
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    fn load(&self) -> SymbolMap {
        match self.source.load() {
            Ok(map) => {
                tracing::info!(
                    source = %self.source.describe(),
                    entries = map.len(),
                    "Loaded symbol map"
                );
                map
            }
            Err(e) => {
                tracing::warn!("Symbol map unavailable, using upper-case fallback only");
                self.activity.error(format!(
                    "Failed to load symbol map from {}: {:#}",
                    self.source.describe(),
                    e
                ));
                SymbolMap::default()
            }
        }
    }
}
