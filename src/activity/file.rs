//! Durable append-only activity log
//!
//! One JSON object per line. Lines that fail to parse are skipped on read.
//! Every call touches the filesystem synchronously; async callers go through
//! [`super::record`] and [`super::read_all`].

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{ActivityLog, LogEntry};

pub struct FileActivityLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, entry: &LogEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

impl ActivityLog for FileActivityLog {
    fn is_blocking(&self) -> bool {
        true
    }

    fn append(&self, entry: LogEntry) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.write_line(&entry) {
            tracing::warn!(
                path = %self.path.display(),
                "Failed to append activity log entry: {}",
                e
            );
        }
    }

    fn read_all(&self) -> Vec<LogEntry> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Failed to read activity log: {}",
                    e
                );
                return Vec::new();
            }
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<LogEntry>(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping malformed activity log line: {}", e);
                    None
                }
            })
            .collect()
    }
}
