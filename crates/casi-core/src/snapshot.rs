// Snapshot storage for booking records
//
// One snapshot per queried date range, keyed by the range's calendar dates.
// The backend sits behind `SnapshotStore` so the service logic never knows
// whether it talks to flat JSON files or an in-memory map.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use casi_api::{Booking, TimeRange};

use crate::error::CoreError;
use crate::time::iso_date;

// ── Key ──────────────────────────────────────────────────────────────

/// Cache key: a time range reduced to calendar-date granularity.
///
/// Distinct ranges on the same calendar days share a snapshot; that is
/// deliberate, query windows always start at midnight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    start: String,
    end: String,
}

impl SnapshotKey {
    pub fn for_range(range: &TimeRange) -> Self {
        Self {
            start: iso_date(range.start),
            end: iso_date(range.end),
        }
    }

    /// File name this key maps to: `data_<start>_<end>.json`.
    pub fn file_name(&self) -> String {
        format!("data_{}_{}.json", self.start, self.end)
    }
}

// ── Store abstraction ────────────────────────────────────────────────

/// Key→snapshot storage.
pub trait SnapshotStore {
    /// Read the snapshot for `key`; `Ok(None)` when none exists.
    fn read(&self, key: &SnapshotKey) -> Result<Option<Vec<Booking>>, CoreError>;

    /// Write (replace) the snapshot for `key`. Last write wins.
    fn write(&self, key: &SnapshotKey, records: &[Booking]) -> Result<(), CoreError>;
}

// ── Flat-file store ──────────────────────────────────────────────────

/// One JSON array per key under a cache directory. No locking or schema
/// version field -- readers must tolerate the raw shape the remote API
/// produced, and the process is single-user interactive.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &SnapshotKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &SnapshotKey) -> Result<Option<Vec<Booking>>, CoreError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CoreError::CacheRead {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        debug!(path = %path.display(), "reading cache snapshot");
        let records = serde_json::from_str(&raw).map_err(|e| CoreError::CacheRead {
            path,
            reason: e.to_string(),
        })?;
        Ok(Some(records))
    }

    fn write(&self, key: &SnapshotKey, records: &[Booking]) -> Result<(), CoreError> {
        let path = self.path_for(key);
        let write_err = |e: std::io::Error| CoreError::CacheWrite {
            path: path.clone(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        let payload = serde_json::to_vec(records).map_err(|e| CoreError::CacheWrite {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        // Write-then-rename: the live file is never left truncated.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;

        debug!(path = %path.display(), records = records.len(), "wrote cache snapshot");
        Ok(())
    }
}

// ── In-memory store ──────────────────────────────────────────────────

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<SnapshotKey, Vec<Booking>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.lock().expect("snapshot lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &SnapshotKey) -> Result<Option<Vec<Booking>>, CoreError> {
        Ok(self
            .snapshots
            .lock()
            .expect("snapshot lock poisoned")
            .get(key)
            .cloned())
    }

    fn write(&self, key: &SnapshotKey, records: &[Booking]) -> Result<(), CoreError> {
        self.snapshots
            .lock()
            .expect("snapshot lock poisoned")
            .insert(key.clone(), records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn key() -> SnapshotKey {
        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date"),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().expect("valid date"),
        );
        SnapshotKey::for_range(&range)
    }

    fn booking(id: &str) -> Booking {
        serde_json::from_value(json!({
            "id": id,
            "timeRange": { "start": "2024-03-01T10:00:00Z", "end": "2024-03-01T12:00:00Z" },
            "distance": 1000,
        }))
        .expect("valid booking")
    }

    #[test]
    fn key_formats_calendar_dates() {
        assert_eq!(key().file_name(), "data_2024-01-01_2024-06-01.json");
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        store.write(&key(), &[booking("b-1")]).expect("write");
        let records = store.read(&key()).expect("read").expect("snapshot exists");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "b-1");
        // The rename completed; no temp file lingers.
        assert!(!dir.path().join("data_2024-01-01_2024-06-01.json.tmp").exists());
    }

    #[test]
    fn file_store_missing_snapshot_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        assert!(store.read(&key()).expect("read").is_none());
    }

    #[test]
    fn file_store_malformed_snapshot_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        fs::write(dir.path().join(key().file_name()), "{not json").expect("seed file");

        assert!(matches!(
            store.read(&key()),
            Err(CoreError::CacheRead { .. })
        ));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.write(&key(), &[booking("b-1")]).expect("write");
        let records = store.read(&key()).expect("read").expect("snapshot exists");

        assert_eq!(records.len(), 1);
        assert_eq!(store.len(), 1);
    }
}
