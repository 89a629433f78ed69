//! Key-value storage backends.
//!
//! The cart is persisted as a single string record under a fixed key, the
//! same contract the mobile app's local storage offers. Two backends ship
//! with the crate:
//!
//! - [`FileStorage`]: one file per key under a directory
//! - [`MemoryStorage`]: an in-process map, for tests and embedding

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::persistence::{ensure_dir, read_optional, write_atomic};

// ============================================================================
// Storage Trait
// ============================================================================

/// Asynchronous string key-value storage.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Reads the record stored under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Record found
    /// * `Ok(None)` - No record under this key
    /// * `Err(e)` - Error accessing storage
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous record.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the record under `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Checks if a record exists.
    async fn contains(&self, key: &str) -> bool {
        matches!(self.get_item(key).await, Ok(Some(_)))
    }
}

// ============================================================================
// File Storage
// ============================================================================

/// Storage that keeps each key in its own JSON file under a directory.
///
/// Keys are escaped into file names, so `@GoMarket:prod` becomes
/// `%40GoMarket%3Aprod.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. The directory is created lazily
    /// on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a storage rooted at `dir`, creating the directory now.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage = Self::new(dir);
        ensure_dir(&storage.dir).await.map_err(into_storage_error)?;
        debug!(dir = %storage.dir.display(), "Opened file storage");
        Ok(storage)
    }

    /// Returns the storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file that holds `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for an empty key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", escape_key(key))))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        debug!(key = %key, path = %path.display(), "Reading storage record");
        read_optional(&path).await.map_err(into_storage_error)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        write_atomic(&path, value).await.map_err(|e| {
            warn!(key = %key, error = %e, "Failed to write storage record");
            into_storage_error(e)
        })
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, "Storage record removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Escapes everything outside `[A-Za-z0-9._-]` as `%XX` (per UTF-8 byte).
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

fn into_storage_error(e: crate::error::StoreError) -> StorageError {
    match e {
        crate::error::StoreError::Io(io) => StorageError::Io(io),
        crate::error::StoreError::Storage(inner) => inner,
        other => StorageError::Backend(other.to_string()),
    }
}

// ============================================================================
// Memory Storage
// ============================================================================

/// In-process storage backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-seeded with one record.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut records = HashMap::new();
        records.insert(key.into(), value.into());
        Self {
            records: RwLock::new(records),
        }
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.records.write().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_key() {
        assert_eq!(escape_key("@GoMarket:prod"), "%40GoMarket%3Aprod");
        assert_eq!(escape_key("plain-key_1.v2"), "plain-key_1.v2");
        assert_eq!(escape_key("a/b"), "a%2Fb");
    }

    #[test]
    fn test_path_for_rejects_empty_key() {
        let storage = FileStorage::new("/tmp/unused");
        assert!(matches!(
            storage.path_for(""),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_storage_crud() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty().await);
        assert_eq!(storage.get_item("k").await.unwrap(), None);

        storage.set_item("k", "v1").await.unwrap();
        storage.set_item("k", "v2").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v2"));
        assert!(storage.contains("k").await);
        assert_eq!(storage.len().await, 1);

        storage.remove_item("k").await.unwrap();
        storage.remove_item("k").await.unwrap();
        assert!(!storage.contains("k").await);
    }

    #[tokio::test]
    async fn test_file_storage_crud() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("records"));

        assert_eq!(storage.get_item("@GoMarket:prod").await.unwrap(), None);

        storage.set_item("@GoMarket:prod", "[]").await.unwrap();
        assert!(temp_dir
            .path()
            .join("records")
            .join("%40GoMarket%3Aprod.json")
            .exists());
        assert_eq!(
            storage.get_item("@GoMarket:prod").await.unwrap().as_deref(),
            Some("[]")
        );

        storage.remove_item("@GoMarket:prod").await.unwrap();
        storage.remove_item("@GoMarket:prod").await.unwrap();
        assert_eq!(storage.get_item("@GoMarket:prod").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_open_creates_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("a").join("b");

        let storage = FileStorage::open(&dir).await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(storage.dir(), dir.as_path());
    }
}
