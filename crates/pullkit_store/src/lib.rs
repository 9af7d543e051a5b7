//! Pullkit Store
//!
//! Persists the header's "last updated" time between runs. Entries are kept
//! in a small JSON object mapping each time key to milliseconds since the
//! Unix epoch:
//!
//! ```json
//! { "pullkit.header.last_updated": 1767225600000 }
//! ```
//!
//! [`FileStore`] implements [`LastUpdatedStore`] so it can be handed straight
//! to a coordinator; every record is written through to disk.

mod error;

pub use error::{Result, StoreError};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pullkit_core::LastUpdatedStore;
use rustc_hash::FxHashMap;

/// Timestamp map backed by a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: FxHashMap<String, u64>,
}

impl FileStore {
    /// Open the store at `path`. A missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => FxHashMap::default(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => FxHashMap::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time stored under `key`
    pub fn get(&self, key: &str) -> Option<SystemTime> {
        self.entries
            .get(key)
            .map(|millis| UNIX_EPOCH + Duration::from_millis(*millis))
    }

    /// Store a time under `key` without writing to disk.
    ///
    /// Times before the epoch are stored as the epoch.
    pub fn set(&mut self, key: &str, at: SystemTime) {
        let millis = at
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_millis() as u64)
            .unwrap_or(0);
        self.entries.insert(key.to_string(), millis);
    }

    /// Write all entries to disk, replacing the file
    pub fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

impl LastUpdatedStore for FileStore {
    fn last_updated(&self, key: &str) -> Option<SystemTime> {
        self.get(key)
    }

    fn record(&mut self, key: &str, at: SystemTime) {
        self.set(key, at);
        if let Err(err) = self.flush() {
            tracing::warn!(key, error = %err, "failed to persist last-updated time");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullkit_core::{RefreshConfig, RefreshCoordinator, RefreshState, DEFAULT_TIME_KEY};

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("times.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get("feed"), None);
    }

    #[test]
    fn test_record_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("times.json");
        let at = UNIX_EPOCH + Duration::from_millis(1_767_225_600_123);

        let mut store = FileStore::open(&path).unwrap();
        store.record("feed", at);
        assert!(path.exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("feed"), Some(at));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_pre_epoch_time_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("times.json")).unwrap();
        store.set("feed", UNIX_EPOCH - Duration::from_secs(10));
        assert_eq!(store.get("feed"), Some(UNIX_EPOCH));
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("times.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("times.json"));
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("times.json");
        fs::write(&path, "\n").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_coordinator_writes_on_end_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("times.json");
        let store = FileStore::open(&path).unwrap();

        let mut coordinator = RefreshCoordinator::new(RefreshConfig::header_only()).with_store(store);
        coordinator.set_header_state(RefreshState::Refreshing);
        coordinator.set_header_state(RefreshState::EndRefresh);

        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get(DEFAULT_TIME_KEY).is_some());
    }
}
