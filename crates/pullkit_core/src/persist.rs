//! Last-updated timestamps
//!
//! The header label shows when the last refresh completed. Where that time
//! lives is up to the host; the coordinator only talks to a
//! [`LastUpdatedStore`].

use std::time::SystemTime;

use rustc_hash::FxHashMap;

/// Keyed storage for completion times
pub trait LastUpdatedStore {
    /// Time last recorded under `key`
    fn last_updated(&self, key: &str) -> Option<SystemTime>;

    /// Record a completion time under `key`
    fn record(&mut self, key: &str, at: SystemTime);
}

/// In-process store, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: FxHashMap<String, SystemTime>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LastUpdatedStore for MemoryStore {
    fn last_updated(&self, key: &str) -> Option<SystemTime> {
        self.entries.get(key).copied()
    }

    fn record(&mut self, key: &str, at: SystemTime) {
        self.entries.insert(key.to_string(), at);
    }
}
