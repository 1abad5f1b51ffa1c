//! Configuration loading for the CLI.
//!
//! The engine configuration comes from an optional TOML file, with command
//! line arguments taking precedence over it.

use std::path::Path;

use anyhow::{Context, Result};
use url::Url;

use trs_common::EngineConfig;

/// Values given on the command line that override the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// TRS URI.
    pub trs_uri: Option<Url>,
    /// Base page size.
    pub base_page_size: Option<usize>,
    /// Change log page size.
    pub changelog_page_size: Option<usize>,
}

impl ConfigOverrides {
    /// Applies the overrides on top of `config`.
    pub fn apply(self, mut config: EngineConfig) -> EngineConfig {
        if let Some(uri) = self.trs_uri {
            config = config.with_trs_uri(uri);
        }
        if let Some(size) = self.base_page_size {
            config = config.with_base_page_size(size);
        }
        if let Some(size) = self.changelog_page_size {
            config = config.with_changelog_page_size(size);
        }
        config
    }
}

/// Loads the effective engine configuration.
pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let config = overrides.apply(config);
    config.validate().context("Invalid configuration")?;

    Ok(config)
}
