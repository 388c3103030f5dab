//! File-backed local storage.
//!
//! The shop persists its state as JSON documents in a small key-value store
//! on disk, one file per key under the configured data directory. Keys are
//! fixed: [`keys::CART`], [`keys::WISHLIST`], and [`keys::SAVED_ADDRESS`].
//!
//! Storage is assumed available; the only failure modes are I/O errors and
//! corrupt documents, both surfaced as [`StorageError`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Fixed storage keys.
pub mod keys {
    /// Cart lines (JSON array of cart items).
    pub const CART: &str = "mono_cart";
    /// Wishlist (JSON array of products).
    pub const WISHLIST: &str = "mono_wishlist";
    /// Saved checkout address (JSON object, shared by both form variants).
    pub const SAVED_ADDRESS: &str = "mono_saved_address";
}

/// Errors from the local store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt record for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A durable key-value store backed by JSON files.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load and deserialize the record for `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not deserialize.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.path_for(key);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    key: key.to_owned(),
                    source,
                });
            }
        };

        let value = serde_json::from_str(&data).map_err(|source| StorageError::Corrupt {
            key: key.to_owned(),
            source,
        })?;
        Ok(Some(value))
    }

    /// Serialize and write the record for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let data = serde_json::to_string(value).map_err(|source| StorageError::Corrupt {
            key: key.to_owned(),
            source,
        })?;
        fs::write(self.path_for(key), data).map_err(|source| StorageError::Io {
            key: key.to_owned(),
            source,
        })
    }

    /// Delete the record for `key`. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    /// Whether a record exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("mono-store-{}", uuid::Uuid::new_v4()));
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let tmp = TempDir::new();
        let store = LocalStore::open(&tmp.0).unwrap();
        let loaded: Option<Vec<String>> = store.load(keys::CART).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = TempDir::new();
        let store = LocalStore::open(&tmp.0).unwrap();

        let value = vec!["a".to_owned(), "b".to_owned()];
        store.save(keys::WISHLIST, &value).unwrap();

        let loaded: Option<Vec<String>> = store.load(keys::WISHLIST).unwrap();
        assert_eq!(loaded, Some(value));
    }

    #[test]
    fn test_corrupt_record_is_typed_error() {
        let tmp = TempDir::new();
        let store = LocalStore::open(&tmp.0).unwrap();

        fs::write(tmp.0.join(format!("{}.json", keys::CART)), "{not json").unwrap();

        let result: Result<Option<Vec<String>>, _> = store.load(keys::CART);
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = TempDir::new();
        let store = LocalStore::open(&tmp.0).unwrap();

        store.save(keys::CART, &vec![1, 2, 3]).unwrap();
        assert!(store.contains(keys::CART));

        store.remove(keys::CART).unwrap();
        assert!(!store.contains(keys::CART));
        // Removing again is fine
        store.remove(keys::CART).unwrap();
    }
}
