//! User-facing boolean settings persisted next to the cache.

use crate::error::StorageError;
use crate::store::{get_json, set_json, KeyValueStore, LAZY_LOAD_KEY, PR_MODE_KEY};
use serde::Serialize;
use std::sync::Arc;

/// Default for the global lazy-load flag
pub const DEFAULT_LAZY_LOAD: bool = false;
/// Default for pull-request mode
pub const DEFAULT_PR_MODE: bool = true;

/// Snapshot of every setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    pub lazy_load: bool,
    pub pr_mode: bool,
}

/// Boolean flags read from and written to a [`KeyValueStore`].
///
/// Reads never fail: a missing or unreadable value falls back to its default.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load every tree lazily, regardless of size
    pub fn lazy_load(&self) -> bool {
        self.read_flag(LAZY_LOAD_KEY, DEFAULT_LAZY_LOAD)
    }

    /// Show the pull-request diff tree when viewing a pull request
    pub fn pr_mode(&self) -> bool {
        self.read_flag(PR_MODE_KEY, DEFAULT_PR_MODE)
    }

    pub fn set_lazy_load(&self, enabled: bool) -> Result<(), StorageError> {
        self.write_flag(LAZY_LOAD_KEY, enabled)
    }

    pub fn set_pr_mode(&self, enabled: bool) -> Result<(), StorageError> {
        self.write_flag(PR_MODE_KEY, enabled)
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            lazy_load: self.lazy_load(),
            pr_mode: self.pr_mode(),
        }
    }

    fn read_flag(&self, key: &str, default: bool) -> bool {
        match get_json::<bool>(self.store.as_ref(), key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read setting, using default");
                default
            }
        }
    }

    fn write_flag(&self, key: &str, value: bool) -> Result<(), StorageError> {
        set_json(self.store.as_ref(), key, &value)?;
        self.store.flush()?;
        tracing::info!(key, value, "Updated setting");
        Ok(())
    }
}
