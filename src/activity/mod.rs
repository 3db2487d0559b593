//! Activity log
//!
//! Records one timestamped entry per market-data outcome. Two interchangeable
//! backends implement [`ActivityLog`]:
//! - [`MemoryActivityLog`]: fixed-capacity ring buffer (oldest evicted first)
//! - [`FileActivityLog`]: durable append-only JSON-lines file
//!
//! Appends never fail from the caller's point of view.

pub mod file;
pub mod memory;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub use file::FileActivityLog;
pub use memory::MemoryActivityLog;

/// Smallest number of entries `read_recent` returns
pub const MIN_RECENT_LIMIT: i64 = 1;

/// Largest number of entries `read_recent` returns
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Severity of an activity entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A single activity record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.message
        )
    }
}

/// Clamp a caller-supplied limit into `[1, 100]`
pub fn clamp_limit(limit: i64) -> usize {
    limit.clamp(MIN_RECENT_LIMIT, MAX_RECENT_LIMIT) as usize
}

/// Render entries one per line, oldest first
pub fn render_entries(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append/read contract shared by every backend
pub trait ActivityLog: Send + Sync {
    /// Append an entry. Backend failures are swallowed.
    fn append(&self, entry: LogEntry);

    /// All retained entries in insertion order
    fn read_all(&self) -> Vec<LogEntry>;

    /// At most `clamp_limit(limit)` most-recent entries, oldest first
    fn read_recent(&self, limit: i64) -> Vec<LogEntry> {
        let mut entries = self.read_all();
        let keep = clamp_limit(limit);
        if entries.len() > keep {
            entries.drain(..entries.len() - keep);
        }
        entries
    }

    fn info(&self, message: String) {
        mirror(LogLevel::Info, &message);
        self.append(LogEntry::info(message));
    }

    fn error(&self, message: String) {
        mirror(LogLevel::Error, &message);
        self.append(LogEntry::error(message));
    }

    /// Whether `append`/`read_all` perform blocking I/O
    fn is_blocking(&self) -> bool {
        false
    }
}

fn mirror(level: LogLevel, message: &str) {
    match level {
        LogLevel::Info => tracing::info!("{}", message),
        LogLevel::Error => tracing::error!("{}", message),
    }
}

/// Append from async code
///
/// Blocking backends run on the blocking pool; the entry is written before
/// this returns.
pub async fn record(log: &Arc<dyn ActivityLog>, level: LogLevel, message: String) {
    mirror(level, &message);
    let entry = LogEntry::new(level, message);

    if !log.is_blocking() {
        log.append(entry);
        return;
    }

    let log = Arc::clone(log);
    if let Err(e) = tokio::task::spawn_blocking(move || log.append(entry)).await {
        tracing::warn!("Activity log append task failed: {}", e);
    }
}

/// `read_all` from async code
pub async fn read_all(log: &Arc<dyn ActivityLog>) -> Vec<LogEntry> {
    if !log.is_blocking() {
        return log.read_all();
    }

    let log = Arc::clone(log);
    tokio::task::spawn_blocking(move || log.read_all())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Activity log read task failed: {}", e);
            Vec::new()
        })
}

/// `read_recent` from async code
pub async fn read_recent(log: &Arc<dyn ActivityLog>, limit: i64) -> Vec<LogEntry> {
    if !log.is_blocking() {
        return log.read_recent(limit);
    }

    let log = Arc::clone(log);
    tokio::task::spawn_blocking(move || log.read_recent(limit))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Activity log read task failed: {}", e);
            Vec::new()
        })
}

/// Which backend to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogBackend {
    /// Durable append-only file
    File,
    /// Bounded in-memory ring buffer
    Memory,
}

impl LogBackend {
    /// Build the backend; `path` is only used by [`LogBackend::File`]
    pub fn build(self, path: impl Into<std::path::PathBuf>) -> Arc<dyn ActivityLog> {
        match self {
            LogBackend::File => Arc::new(FileActivityLog::new(path)),
            LogBackend::Memory => Arc::new(MemoryActivityLog::default()),
        }
    }
}

impl FromStr for LogBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(LogBackend::File),
            "memory" => Ok(LogBackend::Memory),
            other => Err(format!(
                "Invalid log backend '{}': expected 'file' or 'memory'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(-5), 1);
        assert_eq!(clamp_limit(1), 1);
        assert_eq!(clamp_limit(50), 50);
        assert_eq!(clamp_limit(100), 100);
        assert_eq!(clamp_limit(101), 100);
        assert_eq!(clamp_limit(i64::MAX), 100);
    }

    #[test]
    fn test_entry_display() {
        let entry = LogEntry {
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            level: LogLevel::Error,
            message: "Error getting price for BTCUSDT: 404 not found".to_string(),
        };

        assert_eq!(
            entry.to_string(),
            "2024-05-01T12:00:00.000Z [ERROR] Error getting price for BTCUSDT: 404 not found"
        );
    }

    #[test]
    fn test_log_backend_from_str() {
        assert_eq!("file".parse::<LogBackend>().unwrap(), LogBackend::File);
        assert_eq!("Memory".parse::<LogBackend>().unwrap(), LogBackend::Memory);
        assert!("redis".parse::<LogBackend>().is_err());
    }

    #[tokio::test]
    async fn test_record_on_blocking_backend() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogBackend::File.build(dir.path().join("activity.log"));
        assert!(log.is_blocking());

        for i in 0..3 {
            record(&log, LogLevel::Info, format!("entry {}", i)).await;
        }
        record(&log, LogLevel::Error, "failed".to_string()).await;

        let entries = read_all(&log).await;
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3].level, LogLevel::Error);

        let recent = read_recent(&log, 2).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "entry 2");
    }

    #[tokio::test]
    async fn test_record_on_memory_backend() {
        let log = LogBackend::Memory.build("unused");
        assert!(!log.is_blocking());

        record(&log, LogLevel::Info, "hello".to_string()).await;
        assert_eq!(read_recent(&log, 0).await[0].message, "hello");
    }

    #[test]
    fn test_render_entries() {
        let entries = vec![LogEntry::info("first"), LogEntry::info("second")];
        let rendered = render_entries(&entries);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] first"));
        assert!(lines[1].ends_with("[INFO] second"));
    }
}
