//! Key/value persistence
//!
//! The lazy-load cache and the user settings live in a small key/value
//! store. Values are JSON documents stored as raw bytes; the store itself
//! knows nothing about their shape.

pub mod memory;
pub mod persistence;

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use memory::MemoryStore;
pub use persistence::SledStore;

/// Key holding the repository → last-seen map of large repositories
pub const HUGE_REPOS_KEY: &str = "huge_repos";
/// Key holding the global lazy-load flag
pub const LAZY_LOAD_KEY: &str = "lazy_load";
/// Key holding the pull-request mode flag
pub const PR_MODE_KEY: &str = "pr_mode";

/// Byte-oriented key/value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Make pending writes durable. Stores without buffering do nothing.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Read and decode a JSON value.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .map_err(|_| StorageError::InvalidValue(key.to_string()))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Encode and write a JSON value.
pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes)
}
