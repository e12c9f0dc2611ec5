//! Base layer: every default from [`SidetreeConfig::default`].

use crate::config::SidetreeConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&SidetreeConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
