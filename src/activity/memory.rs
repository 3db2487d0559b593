//! Bounded in-memory activity log

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{clamp_limit, ActivityLog, LogEntry};

/// Default ring-buffer capacity
pub const DEFAULT_CAPACITY: usize = 1000;

/// Fixed-capacity ring buffer; appending to a full buffer evicts the oldest entry
pub struct MemoryActivityLog {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl MemoryActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryActivityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ActivityLog for MemoryActivityLog {
    fn append(&self, entry: LogEntry) {
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    fn read_all(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    fn read_recent(&self, limit: i64) -> Vec<LogEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(clamp_limit(limit));
        entries.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_evicts_oldest_after_capacity() {
        let log = MemoryActivityLog::default();
        for i in 0..=DEFAULT_CAPACITY {
            log.append(LogEntry::info(format!("entry {}", i)));
        }

        let entries = log.read_all();
        assert_eq!(entries.len(), DEFAULT_CAPACITY);
        assert_eq!(entries[0].message, "entry 1");
        assert_eq!(entries[DEFAULT_CAPACITY - 1].message, "entry 1000");
        assert!(entries.iter().all(|e| e.message != "entry 0"));
        for (idx, entry) in entries.iter().enumerate() {
            assert_eq!(entry.message, format!("entry {}", idx + 1));
        }
    }

    #[test]
    fn test_read_recent_clamps() {
        let log = MemoryActivityLog::with_capacity(500);
        for i in 0..150 {
            log.append(LogEntry::info(format!("entry {}", i)));
        }

        assert_eq!(log.read_recent(0).len(), 1);
        assert_eq!(log.read_recent(-3).len(), 1);
        assert_eq!(log.read_recent(10).len(), 10);
        assert_eq!(log.read_recent(1000).len(), 100);

        let recent = log.read_recent(3);
        assert_eq!(recent[0].message, "entry 147");
        assert_eq!(recent[2].message, "entry 149");
    }

    #[test]
    fn test_read_recent_fewer_than_limit() {
        let log = MemoryActivityLog::default();
        log.append(LogEntry::info("only"));
        assert_eq!(log.read_recent(50).len(), 1);
    }

    #[test]
    fn test_concurrent_append() {
        let log = Arc::new(MemoryActivityLog::with_capacity(100));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        log.append(LogEntry::info(format!("thread {} entry {}", t, i)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.len(), 100);
        assert_eq!(log.capacity(), 100);
    }
}
