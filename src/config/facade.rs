//! ConfigLoader facade over the merge service.

use super::merge::service::MergeService;
use super::SidetreeConfig;
use crate::error::ApiError;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the standard sources and validate.
    pub fn load() -> Result<SidetreeConfig, ApiError> {
        let config = MergeService::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load with `path` layered over the standard sources and validate.
    pub fn load_from_file(path: &Path) -> Result<SidetreeConfig, ApiError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// `path` when given, else the standard sources.
    pub fn load_optional(path: Option<&Path>) -> Result<SidetreeConfig, ApiError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    pub fn default() -> SidetreeConfig {
        SidetreeConfig::default()
    }
}
