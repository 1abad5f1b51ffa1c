//! Engine configuration structures.
//!
//! An engine is fully described by its TRS URI and its two page sizes. The
//! initial resource collection is supplied separately at construction.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_BASE_PAGE_SIZE, DEFAULT_CHANGELOG_PAGE_SIZE, DEFAULT_TRS_URI, NIL_URI,
};
use crate::error::{TrsError, TrsResult};

/// Construction-time configuration of an engine.
///
/// # Example
///
/// ```rust
/// use trs_common::config::EngineConfig;
///
/// let config = EngineConfig::new("http://localhost:1337/trs/")
///     .unwrap()
///     .with_base_page_size(5)
///     .with_changelog_page_size(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// URI of the Tracked Resource Set. Base and change log locations are
    /// derived from it.
    #[serde(default = "default_trs_uri")]
    pub trs_uri: Url,

    /// Maximum number of members per base page.
    #[serde(default = "default_base_page_size")]
    pub base_page_size: usize,

    /// Maximum number of change events per change log page.
    #[serde(default = "default_changelog_page_size")]
    pub changelog_page_size: usize,
}

fn default_trs_uri() -> Url {
    Url::parse(DEFAULT_TRS_URI).expect("default TRS URI is a valid absolute URI")
}

fn default_base_page_size() -> usize {
    DEFAULT_BASE_PAGE_SIZE
}

fn default_changelog_page_size() -> usize {
    DEFAULT_CHANGELOG_PAGE_SIZE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trs_uri: default_trs_uri(),
            base_page_size: default_base_page_size(),
            changelog_page_size: default_changelog_page_size(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration for the given TRS URI with default page sizes.
    pub fn new(trs_uri: &str) -> TrsResult<Self> {
        let trs_uri = Url::parse(trs_uri).map_err(|e| {
            TrsError::invalid_configuration(format!("TRS URI '{trs_uri}' is not valid: {e}"))
        })?;
        Ok(Self {
            trs_uri,
            ..Default::default()
        })
    }

    /// Sets the TRS URI.
    #[must_use]
    pub fn with_trs_uri(mut self, trs_uri: Url) -> Self {
        self.trs_uri = trs_uri;
        self
    }

    /// Sets the base page size.
    #[must_use]
    pub fn with_base_page_size(mut self, size: usize) -> Self {
        self.base_page_size = size;
        self
    }

    /// Sets the change log page size.
    #[must_use]
    pub fn with_changelog_page_size(mut self, size: usize) -> Self {
        self.changelog_page_size = size;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TrsResult<()> {
        check_page_size("base", self.base_page_size)?;
        check_page_size("changelog", self.changelog_page_size)?;

        if self.trs_uri.cannot_be_a_base() {
            return Err(TrsError::invalid_configuration(format!(
                "TRS URI '{}' cannot carry path segments",
                self.trs_uri
            )));
        }

        if self.trs_uri.as_str() == NIL_URI {
            return Err(TrsError::invalid_configuration(
                "TRS URI must not be the NIL sentinel",
            ));
        }

        Ok(())
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> TrsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML document.
    pub fn from_toml(content: &str) -> TrsResult<Self> {
        toml::from_str(content).map_err(|e| TrsError::config_parse(e.to_string()))
    }

    /// Saves configuration to a TOML file.
    pub fn save(&self, path: &Path) -> TrsResult<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Converts configuration to a TOML string.
    pub fn to_toml(&self) -> TrsResult<String> {
        toml::to_string_pretty(self).map_err(|e| TrsError::config_parse(e.to_string()))
    }
}

fn check_page_size(feed: &str, size: usize) -> TrsResult<()> {
    if size == 0 {
        return Err(TrsError::invalid_configuration(format!(
            "{feed} page size must be positive"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.trs_uri.as_str(), DEFAULT_TRS_URI);
        assert_eq!(config.base_page_size, DEFAULT_BASE_PAGE_SIZE);
        assert_eq!(config.changelog_page_size, DEFAULT_CHANGELOG_PAGE_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new("http://localhost:1337/trs/")
            .unwrap()
            .with_base_page_size(5)
            .with_changelog_page_size(7);

        assert_eq!(config.trs_uri.as_str(), "http://localhost:1337/trs/");
        assert_eq!(config.base_page_size, 5);
        assert_eq!(config.changelog_page_size, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        // Zero base page size
        let config = EngineConfig::default().with_base_page_size(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base page size"));

        // Zero changelog page size
        let config = EngineConfig::default().with_changelog_page_size(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("changelog page size"));

        // URI without a hierarchical path
        let config =
            EngineConfig::default().with_trs_uri(Url::parse("urn:example:trs").unwrap());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_any_positive_page_size_accepted() {
        let config = EngineConfig::default()
            .with_base_page_size(200_000)
            .with_changelog_page_size(usize::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_uri() {
        let err = EngineConfig::new("not a uri").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml("base_page_size = 5\n").unwrap();
        assert_eq!(config.base_page_size, 5);
        assert_eq!(config.changelog_page_size, DEFAULT_CHANGELOG_PAGE_SIZE);
        assert_eq!(config.trs_uri.as_str(), DEFAULT_TRS_URI);
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml("base_page_size = \"five\"").unwrap_err();
        assert!(matches!(err, TrsError::ConfigParse { .. }));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("conf").join("trs.toml");

        let config = EngineConfig::new("http://host/trs/")
            .unwrap()
            .with_base_page_size(3)
            .with_changelog_page_size(4);
        config.save(&path).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = EngineConfig::from_file(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, TrsError::Io { .. }));
    }
}
