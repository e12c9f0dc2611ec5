//! Configuration
//!
//! Layered with the `config` crate: built-in defaults, then the global file
//! (`$XDG_CONFIG_HOME/sidetree/config.toml`), then an explicit `--config`
//! file, then `SIDETREE__SECTION__KEY` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;
pub mod xdg;

use crate::cache::{CachePolicy, DEFAULT_CAPACITY, DEFAULT_MAX_FUTURE_SKEW_MS};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use facade::ConfigLoader;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidetreeConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SidetreeConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.cache.capacity == 0 {
            return Err(ApiError::ConfigError(
                "cache.capacity must be at least 1".to_string(),
            ));
        }
        if self.cache.max_future_skew_ms < 0 {
            return Err(ApiError::ConfigError(
                "cache.max_future_skew_ms must not be negative".to_string(),
            ));
        }
        if self.remote.api_base.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "remote.api_base must not be empty".to_string(),
            ));
        }
        if self.remote.per_page == 0 {
            return Err(ApiError::ConfigError(
                "remote.per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[cache]`: limits of the lazy-load cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// How far ahead of the local clock a stored timestamp may be
    #[serde(default = "default_max_future_skew_ms")]
    pub max_future_skew_ms: i64,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_max_future_skew_ms() -> i64 {
    DEFAULT_MAX_FUTURE_SKEW_MS
}

impl CacheConfig {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            capacity: self.capacity,
            max_future_skew_ms: self.max_future_skew_ms,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            max_future_skew_ms: default_max_future_skew_ms(),
        }
    }
}

/// `[storage]`: where the sled database lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Unset means `$XDG_DATA_HOME/sidetree/store`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => Ok(xdg::data_dir()?.join("store")),
        }
    }
}

/// `[remote]`: the hosting API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Personal access token, sent as `Authorization: token ...`
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Upper bound on pages fetched for one pull request
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("sidetree/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[local]`: listing of on-disk checkouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Files listed before the listing reports truncation; 0 is unlimited
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

fn default_max_entries() -> usize {
    100_000
}

fn default_true() -> bool {
    true
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            include_hidden: default_true(),
        }
    }
}
