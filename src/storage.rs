//! Durable local state for the persisted stores.
//!
//! Bookmarks and the comparison selection survive restarts. Each store
//! snapshot is written under its own key, wrapped in a versioned envelope:
//!
//! ```json
//! {"version": 1, "data": { ... }}
//! ```
//!
//! A payload without an envelope is treated as version 0, the flat state
//! object older web clients stored, and is passed through
//! [`Persisted::migrate`].
//!
//! # Examples
//!
//! ```rust
//! use atlas::storage::{self, MemoryStorage, Storage};
//! use atlas::store::ComparisonState;
//!
//! # fn example() -> atlas::Result<()> {
//! let backend = MemoryStorage::new();
//! storage::save(&backend, &ComparisonState::default())?;
//!
//! let restored: Option<ComparisonState> = storage::load(&backend)?;
//! assert!(restored.is_some());
//! # Ok(())
//! # }
//! ```

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::{Error, Result};

/// Byte-level key/value storage.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write(&self, key: &str, data: &[u8]) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// A store snapshot with a stable storage key and schema version.
pub trait Persisted: Serialize + DeserializeOwned {
    /// Storage key, also the file stem for [`FileStorage`]
    const KEY: &'static str;

    /// Current schema version written by [`save`]
    const VERSION: u32;

    /// Upgrades data written under an older `version`.
    ///
    /// Version 0 is a payload that carried no envelope at all.
    fn migrate(version: u32, data: Value) -> Result<Self>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

/// Writes `value` under its key in the current schema version.
pub fn save<T: Persisted>(storage: &dyn Storage, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(&EnvelopeRef {
        version: T::VERSION,
        data: value,
    })?;
    storage.write(T::KEY, &bytes)
}

/// Reads and, if needed, migrates the value stored under `T::KEY`.
///
/// # Errors
///
/// * [`Error::Json`] - If the payload is not JSON or does not match the schema
/// * [`Error::Storage`] - If it was written by a newer schema version
pub fn load<T: Persisted>(storage: &dyn Storage) -> Result<Option<T>> {
    let Some(bytes) = storage.read(T::KEY)? else {
        return Ok(None);
    };

    let raw: Value = serde_json::from_slice(&bytes)?;
    let is_envelope = raw.get("version").is_some() && raw.get("data").is_some();
    if !is_envelope {
        return T::migrate(0, raw).map(Some);
    }

    let envelope: Envelope = serde_json::from_value(raw)?;
    match envelope.version {
        v if v == T::VERSION => Ok(Some(serde_json::from_value(envelope.data)?)),
        v if v > T::VERSION => Err(Error::storage(format!(
            "{} was written by schema version {} (supported: {})",
            T::KEY,
            v,
            T::VERSION
        ))),
        v => T::migrate(v, envelope.data).map(Some),
    }
}

/// Loads persisted state, falling back to the default when it is missing
/// or unreadable.
pub fn restore_or_default<T: Persisted + Default>(storage: &dyn Storage) -> T {
    match load(storage) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key = T::KEY, error = %e, "discarding unreadable persisted state");
            T::default()
        }
    }
}

/// Saves and logs on failure; persistence never fails a store operation.
pub(crate) fn save_logged<T: Persisted>(storage: &dyn Storage, value: &T) {
    if let Err(e) = save(storage, value) {
        warn!(key = T::KEY, error = %e, "failed to persist state");
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary file that is synced and then renamed over the
/// target, so a crash never leaves a half-written file behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        atomic_write(&self.path_for(key), data)
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;
    Ok(())
}

/// In-process storage, for tests and for embedders without a disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        self.entries.lock().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    impl Persisted for Counter {
        const KEY: &'static str = "counter";
        const VERSION: u32 = 2;

        fn migrate(version: u32, data: Value) -> Result<Self> {
            match version {
                0 | 1 => Ok(Counter {
                    count: data["n"].as_u64().unwrap_or(0) as u32,
                }),
                other => Err(Error::storage(format!("unknown version {}", other))),
            }
        }
    }

    #[test]
    fn test_file_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));

        assert!(load::<Counter>(&storage).unwrap().is_none());

        save(&storage, &Counter { count: 3 }).unwrap();
        assert!(storage.path_for("counter").exists());
        assert!(!storage.path_for("counter").with_extension("tmp").exists());

        assert_eq!(load::<Counter>(&storage).unwrap(), Some(Counter { count: 3 }));

        storage.remove("counter").unwrap();
        storage.remove("counter").unwrap();
        assert!(load::<Counter>(&storage).unwrap().is_none());
    }

    #[test]
    fn test_unversioned_payload_is_migrated() {
        let storage = MemoryStorage::new();
        storage.write("counter", br#"{"n": 7}"#).unwrap();
        assert_eq!(load::<Counter>(&storage).unwrap(), Some(Counter { count: 7 }));
    }

    #[test]
    fn test_older_version_is_migrated() {
        let storage = MemoryStorage::new();
        let old = json!({"version": 1, "data": {"n": 2}});
        storage.write("counter", old.to_string().as_bytes()).unwrap();
        assert_eq!(load::<Counter>(&storage).unwrap(), Some(Counter { count: 2 }));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let storage = MemoryStorage::new();
        let newer = json!({"version": 9, "data": {"count": 1}});
        storage.write("counter", newer.to_string().as_bytes()).unwrap();

        assert!(matches!(load::<Counter>(&storage), Err(Error::Storage(_))));
        assert_eq!(restore_or_default::<Counter>(&storage), Counter::default());
    }

    #[test]
    fn test_corrupt_payload_restores_default() {
        let storage = MemoryStorage::new();
        storage.write("counter", b"not json").unwrap();
        assert_eq!(restore_or_default::<Counter>(&storage), Counter::default());
    }
}
