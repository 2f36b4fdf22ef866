//! Orchestrator configuration
//!
//! The site list and manifest path are plain data injected into the
//! registry at construction, so tests can point the pipeline at mock
//! sites without touching process-global state.

use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A remote site that may publish a capability manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Human-readable site name, used in trace entries and results
    pub name: String,
    /// Base URL; the manifest path and intent endpoints are joined onto it
    pub base_url: String,
}

impl Site {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

/// Configuration for one orchestrator instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Sites polled for capability manifests, in discovery order
    pub sites: Vec<Site>,

    /// Path of the manifest document relative to each site's base URL
    ///
    /// Joined as `{base_url}/{manifest_path}`.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
}

fn default_manifest_path() -> String {
    "agent.json".into()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            sites: vec![
                Site::new("creator-studio", "http://localhost:3001"),
                Site::new("merch-store", "http://localhost:3002"),
                Site::new("booking-desk", "http://localhost:3003"),
            ],
            manifest_path: default_manifest_path(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Manifest URL for a site
    pub fn manifest_url(&self, site: &Site) -> String {
        format!(
            "{}/{}",
            site.base_url.trim_end_matches('/'),
            self.manifest_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_sites() {
        let config = RelayConfig::default();
        assert!(!config.sites.is_empty());
        assert_eq!(config.manifest_path, "agent.json");
    }

    #[test]
    fn test_from_toml() {
        let text = r#"
            manifest_path = "capabilities.json"

            [[sites]]
            name = "alpha"
            base_url = "http://localhost:9001"

            [[sites]]
            name = "beta"
            base_url = "http://localhost:9002/"
        "#;
        let config = RelayConfig::from_toml(text).unwrap();
        assert_eq!(config.sites.len(), 2);
        assert_eq!(config.sites[0].name, "alpha");
        assert_eq!(config.manifest_path, "capabilities.json");
    }

    #[test]
    fn test_from_toml_default_manifest_path() {
        let text = r#"
            [[sites]]
            name = "alpha"
            base_url = "http://localhost:9001"
        "#;
        let config = RelayConfig::from_toml(text).unwrap();
        assert_eq!(config.manifest_path, "agent.json");
    }

    #[test]
    fn test_manifest_url_trims_trailing_slash() {
        let config = RelayConfig::default();
        let site = Site::new("beta", "http://localhost:9002/");
        assert_eq!(
            config.manifest_url(&site),
            "http://localhost:9002/agent.json"
        );
    }
}
