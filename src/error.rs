//! Error types shared across the crate.

use thiserror::Error;

/// Failures raised by a [`KeyValueStore`](crate::store::KeyValueStore) backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Value for key '{0}' is not valid UTF-8 JSON")]
    InvalidValue(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Crate-level error returned by services, sources and tooling.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Fetch failed for {repo}: {message}")]
    FetchError { repo: String, message: String },

    #[error("Remote returned status {status} for {url}")]
    RemoteStatus { status: u16, url: String },

    #[error("Invalid repository reference: {0}")]
    InvalidRepo(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation not supported by {source_name}: {operation}")]
    Unsupported {
        source_name: &'static str,
        operation: &'static str,
    },
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        match err.status() {
            Some(status) => ApiError::RemoteStatus {
                status: status.as_u16(),
                url,
            },
            None => ApiError::FetchError {
                repo: url,
                message: err.to_string(),
            },
        }
    }
}
