//! Persistent snapshot store.
//!
//! One canonical JSON document holds the last-known-good snapshot. Writes
//! go to a temp file and rename over the target, so concurrent readers
//! only ever observe a complete document. Read failures of any kind
//! (missing file, corruption) degrade to "absent" — cold cache is not an
//! error at this boundary.

use chrono::{Duration, Utc};
use common::types::{CacheStatus, Snapshot};
use common::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Durable last-known-good snapshot storage.
pub trait SnapshotStore: Send + Sync {
    /// The current snapshot, or `None` when absent or unreadable.
    fn get(&self) -> Option<Snapshot>;

    /// Replace the snapshot wholesale. Atomic from a reader's viewpoint.
    fn put(&self, snapshot: &Snapshot) -> Result<(), Error>;

    /// Age of the current snapshot. `None` when no snapshot exists.
    fn age(&self) -> Option<Duration>;
}

/// File-backed store holding the single canonical snapshot document.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn get(&self) -> Option<Snapshot> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Error reading snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(
                    "Corrupt snapshot at {}; treating as absent: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn put(&self, snapshot: &Snapshot) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("create {}: {}", parent.display(), e)))?;
        }

        let body = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, body).map_err(|e| Error::Store(format!("write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Store(format!(
                "rename {} -> {}: {}",
                tmp.display(),
                self.path.display(),
                e
            ))
        })?;

        info!("Snapshot persisted at {}", snapshot.updated_at);
        Ok(())
    }

    fn age(&self) -> Option<Duration> {
        let snapshot = self.get()?;
        Some(Utc::now() - snapshot.updated_at)
    }
}

/// In-memory store for tests and dry wiring.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<Option<Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self) -> Option<Snapshot> {
        self.inner.lock().expect("store lock poisoned").clone()
    }

    fn put(&self, snapshot: &Snapshot) -> Result<(), Error> {
        *self.inner.lock().expect("store lock poisoned") = Some(snapshot.clone());
        Ok(())
    }

    fn age(&self) -> Option<Duration> {
        let guard = self.inner.lock().expect("store lock poisoned");
        guard.as_ref().map(|s| Utc::now() - s.updated_at)
    }
}

/// Compute the status document exposed at the service boundary.
///
/// Derived from a single read so every field describes the same snapshot
/// even while a writer is swapping documents underneath.
pub fn cache_status(store: &dyn SnapshotStore) -> CacheStatus {
    match store.get() {
        Some(snapshot) => {
            let age = Utc::now() - snapshot.updated_at;
            let hours = age.num_milliseconds() as f64 / 3_600_000.0;
            CacheStatus {
                has_data: true,
                updated_at: Some(snapshot.updated_at),
                age_hours: Some((hours * 100.0).round() / 100.0),
                countries_count: snapshot.data.len(),
            }
        }
        None => CacheStatus {
            has_data: false,
            updated_at: None,
            age_hours: None,
            countries_count: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::{CountrySnapshot, GdpReading, IndexReading};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn sample_snapshot(ids: &[&str]) -> Snapshot {
        let mut data = BTreeMap::new();
        for id in ids {
            let mut indices = BTreeMap::new();
            indices.insert(
                "Test Index".to_string(),
                IndexReading {
                    value: Some("1,234.56".into()),
                    found: true,
                    error: None,
                },
            );
            data.insert(
                id.to_string(),
                CountrySnapshot {
                    indices,
                    gdp: GdpReading::not_found(),
                },
            );
        }
        Snapshot {
            updated_at: Utc::now(),
            data,
        }
    }

    #[test]
    fn test_absent_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(dir.path().join("cache.json"));
        assert!(store.get().is_none());
        assert!(store.age().is_none());
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(dir.path().join("data/cache.json"));

        let snapshot = sample_snapshot(&["gbr", "jpn"]);
        store.put(&snapshot).expect("put succeeds");

        let read = store.get().expect("snapshot present");
        assert_eq!(read, snapshot);
        // Temp file is gone after the swap.
        assert!(!store.tmp_path().exists());

        let age = store.age().expect("age present");
        assert!(age.num_seconds() < 60);
    }

    #[test]
    fn test_put_replaces_wholesale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(dir.path().join("cache.json"));

        store.put(&sample_snapshot(&["gbr", "jpn"])).expect("put");
        store.put(&sample_snapshot(&["fra"])).expect("put");

        let read = store.get().expect("snapshot present");
        assert_eq!(read.data.len(), 1);
        assert!(read.data.contains_key("fra"));
    }

    #[test]
    fn test_corrupt_file_degrades_to_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ not json").expect("write");

        let store = FileSnapshotStore::new(path);
        assert!(store.get().is_none());
        assert!(store.age().is_none());
    }

    #[test]
    fn test_readers_never_observe_partial_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        let store = Arc::new(FileSnapshotStore::new(path));

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..30 {
                    let ids = if i % 2 == 0 {
                        vec!["usa", "can", "mex", "bra"]
                    } else {
                        vec!["gbr", "deu", "fra", "ita"]
                    };
                    store.put(&sample_snapshot(&ids)).expect("put");
                }
            })
        };

        // Every read is either absent or a complete 4-country document.
        for _ in 0..200 {
            if let Some(snapshot) = store.get() {
                assert_eq!(snapshot.data.len(), 4);
            }
        }

        writer.join().expect("writer thread");
    }

    #[test]
    fn test_cache_status_cold() {
        let store = MemorySnapshotStore::new();
        let status = cache_status(&store);
        assert!(!status.has_data);
        assert!(status.updated_at.is_none());
        assert!(status.age_hours.is_none());
        assert_eq!(status.countries_count, 0);
    }

    /// Yields the snapshot exactly once, as if a racing writer swapped the
    /// document away right after the first read.
    struct VanishingStore {
        snapshot: Mutex<Option<Snapshot>>,
    }

    impl SnapshotStore for VanishingStore {
        fn get(&self) -> Option<Snapshot> {
            self.snapshot.lock().expect("store lock poisoned").take()
        }

        fn put(&self, snapshot: &Snapshot) -> Result<(), Error> {
            *self.snapshot.lock().expect("store lock poisoned") = Some(snapshot.clone());
            Ok(())
        }

        fn age(&self) -> Option<Duration> {
            self.get().map(|s| Utc::now() - s.updated_at)
        }
    }

    #[test]
    fn test_cache_status_fields_describe_one_snapshot() {
        let mut snapshot = sample_snapshot(&["gbr", "jpn"]);
        snapshot.updated_at = Utc::now() - Duration::minutes(90);
        let store = VanishingStore {
            snapshot: Mutex::new(Some(snapshot)),
        };

        let status = cache_status(&store);
        assert!(status.has_data);
        assert!(status.updated_at.is_some());
        assert_eq!(status.countries_count, 2);
        let age = status.age_hours.expect("age from the same snapshot");
        assert!((age - 1.5).abs() < 0.05, "age was {}", age);
    }

    #[test]
    fn test_cache_status_warm() {
        let store = MemorySnapshotStore::new();
        let mut snapshot = sample_snapshot(&["gbr", "jpn", "usa"]);
        snapshot.updated_at = Utc::now() - Duration::minutes(90);
        store.put(&snapshot).expect("put");

        let status = cache_status(&store);
        assert!(status.has_data);
        assert_eq!(status.countries_count, 3);
        let age = status.age_hours.expect("age present");
        assert!((age - 1.5).abs() < 0.05, "age was {}", age);
    }
}
