//! Durable local key-value storage for store records.
//!
//! Each store persists one record under its own key. Records are wrapped in a
//! versioned envelope:
//!
//! ```json
//! { "state": { "lines": [...] }, "version": 0 }
//! ```
//!
//! Loading is forgiving: a missing, unreadable or corrupt record yields `None`
//! and the store starts empty. Saving is best-effort: failures are logged and
//! never surface to store callers.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage key for the auth session record.
pub const AUTH_KEY: &str = "auth-storage";
/// Storage key for the cart record.
pub const CART_KEY: &str = "cart-storage";
/// Storage key for the wishlist record.
pub const WISHLIST_KEY: &str = "wishlist-storage";

/// Current envelope version written by [`save_record`].
pub const RECORD_VERSION: u32 = 0;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage shared by all stores.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FileStorage
// =============================================================================

/// One JSON file per key inside a directory.
///
/// Writes go to `<key>.json.tmp` and are renamed over `<key>.json`, so a
/// process killed mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The directory records are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage; contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// =============================================================================
// Versioned Records
// =============================================================================

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

/// Load and decode the record stored under `key`.
///
/// Returns `None` when the key is absent, the backend fails, the JSON is
/// corrupt, or the envelope version is unknown. Failures are logged.
pub fn load_record<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "No persisted record");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted record");
            return None;
        }
    };

    match serde_json::from_str::<Envelope<T>>(&raw) {
        Ok(envelope) if envelope.version == RECORD_VERSION => Some(envelope.state),
        Ok(envelope) => {
            warn!(key, version = envelope.version, "Ignoring record with unknown version");
            None
        }
        Err(e) => {
            warn!(key, error = %e, "Ignoring corrupt persisted record");
            None
        }
    }
}

/// Encode and store `state` under `key`, logging instead of failing.
pub fn save_record<T: Serialize>(storage: &dyn Storage, key: &str, state: &T) {
    let envelope = EnvelopeRef {
        state,
        version: RECORD_VERSION,
    };

    let result = serde_json::to_string(&envelope)
        .map_err(StorageError::from)
        .and_then(|json| storage.write(key, &json));

    if let Err(e) = result {
        warn!(key, error = %e, "Failed to persist record");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    // =========================================================================
    // FileStorage Tests
    // =========================================================================

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested")).unwrap();

        assert!(storage.read("cart-storage").unwrap().is_none());

        storage.write("cart-storage", "{\"a\":1}").unwrap();
        assert_eq!(storage.read("cart-storage").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(dir.path().join("nested/cart-storage.json").exists());
        assert!(!dir.path().join("nested/cart-storage.json.tmp").exists());

        storage.remove("cart-storage").unwrap();
        assert!(storage.read("cart-storage").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.remove("never-written").is_ok());
    }

    #[test]
    fn test_file_storage_overwrite_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.write("k", "first").unwrap();
        storage.write("k", "second").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("second"));
    }

    // =========================================================================
    // Record Envelope Tests
    // =========================================================================

    #[test]
    fn test_record_roundtrip_uses_envelope() {
        let storage = MemoryStorage::new();
        save_record(&storage, "counter", &Counter { value: 3 });

        let raw = storage.read("counter").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["value"], 3);

        let loaded: Option<Counter> = load_record(&storage, "counter");
        assert_eq!(loaded, Some(Counter { value: 3 }));
    }

    #[test]
    fn test_missing_record_loads_none() {
        let storage = MemoryStorage::new();
        assert_eq!(load_record::<Counter>(&storage, "counter"), None);
    }

    #[test]
    fn test_corrupt_record_loads_none() {
        let storage = MemoryStorage::new();
        storage.write("counter", "{ this is not json").unwrap();
        assert_eq!(load_record::<Counter>(&storage, "counter"), None);

        storage.write("counter", r#"{"state":{"wrong":1},"version":0}"#).unwrap();
        assert_eq!(load_record::<Counter>(&storage, "counter"), None);
    }

    #[test]
    fn test_unknown_version_loads_none() {
        let storage = MemoryStorage::new();
        storage
            .write("counter", r#"{"state":{"value":1},"version":7}"#)
            .unwrap();
        assert_eq!(load_record::<Counter>(&storage, "counter"), None);
    }
}
