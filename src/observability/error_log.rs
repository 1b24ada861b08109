//! Recent error buffer.
//!
//! # Responsibilities
//! - Keep the most recent error records, oldest first
//! - Drop the oldest record once capacity is reached
//! - Hand out point-in-time copies to readers

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// One captured error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    /// Module path (or tracing target) that emitted the error.
    pub target: String,
    pub message: String,
}

impl ErrorRecord {
    /// Create a record stamped with the current time.
    pub fn now(target: impl Into<String>, message: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            timestamp,
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Read access to recently recorded errors.
pub trait ErrorLog: Send + Sync {
    /// Recorded errors, oldest first.
    fn recent_errors(&self) -> Vec<ErrorRecord>;
}

/// Bounded in-memory [`ErrorLog`].
#[derive(Debug)]
pub struct RecentErrors {
    records: Mutex<VecDeque<ErrorRecord>>,
    capacity: usize,
}

impl RecentErrors {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append a record, evicting the oldest when full.
    pub fn push(&self, record: ErrorRecord) {
        if self.capacity == 0 {
            return;
        }
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorLog for RecentErrors {
    fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let log = RecentErrors::new(10);
        log.push(ErrorRecord::now("a", "first"));
        log.push(ErrorRecord::now("b", "second"));

        let messages: Vec<_> = log.recent_errors().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_drops_oldest_past_capacity() {
        let log = RecentErrors::new(2);
        for i in 0..5 {
            log.push(ErrorRecord::now("t", format!("error {}", i)));
        }
        assert_eq!(log.len(), 2);
        let messages: Vec<_> = log.recent_errors().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["error 3", "error 4"]);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let log = RecentErrors::new(0);
        log.push(ErrorRecord::now("t", "dropped"));
        assert!(log.is_empty());
    }
}
