//! MergeService: stacks sources and deserializes into [`SidetreeConfig`].

use crate::config::sources::{environment, global_file};
use crate::config::SidetreeConfig;
use config::{ConfigError, File, FileFormat};
use std::path::Path;

use super::merge_policy;

pub struct MergeService;

impl MergeService {
    /// defaults → global file → environment
    pub fn load() -> Result<SidetreeConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// defaults → global file → `path` → environment
    pub fn load_from_file(path: &Path) -> Result<SidetreeConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Message(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }
}
