//! Capability discovery
//!
//! The registry polls every configured site for its capability manifest and
//! merges the published intents into a single pool. Discovery never aborts an
//! invocation: a site that is unreachable, answers with a non-success status,
//! or publishes a malformed manifest contributes zero intents and processing
//! continues with the remaining sites.

use crate::core::config::{RelayConfig, Site};
use crate::core::error::{RelayError, Result};
use crate::trace::{TraceEntry, TraceKind};
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// A remotely executable capability, annotated at discovery time with the
/// owning site so dispatch never has to re-resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub name: String,
    pub description: String,
    /// Endpoint path, joined onto `base_url` at dispatch time
    pub endpoint: String,
    pub base_url: String,
    /// Name of the publishing site, carried into action results
    pub site: String,
}

/// Wire form of one manifest entry; unknown fields are ignored
#[derive(Debug, Clone, Deserialize)]
struct ManifestIntent {
    name: String,
    #[serde(default)]
    description: String,
    endpoint: String,
}

/// Wire form of a site's manifest document
#[derive(Debug, Deserialize)]
struct Manifest {
    intents: Vec<ManifestIntent>,
}

/// Merged pool of discovered intents, keyed by intent name.
///
/// Merge policy is first-write-wins: if two sites publish the same intent
/// name, the site discovered first keeps the slot and the conflict is
/// surfaced to the caller instead of silently replacing the earlier entry.
#[derive(Debug, Default)]
pub struct IntentPool {
    intents: HashMap<String, Intent>,
}

impl IntentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an intent; on a name conflict the pool is unchanged and the
    /// name of the site that already owns the slot is returned.
    pub fn insert(&mut self, intent: Intent) -> Option<String> {
        match self.intents.get(&intent.name) {
            Some(existing) => Some(existing.site.clone()),
            None => {
                self.intents.insert(intent.name.clone(), intent);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Intent> {
        self.intents.get(name)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Outcome of one discovery pass
#[derive(Debug)]
pub struct DiscoveryOutcome {
    pub pool: IntentPool,
    /// Trace entries in site order, ready to append to the invocation trace
    pub log: Vec<TraceEntry>,
}

/// Fetches and merges capability manifests for a fixed site list.
pub struct CapabilityRegistry {
    config: RelayConfig,
    client: Client,
}

impl CapabilityRegistry {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Registry sharing an existing HTTP client
    pub fn with_client(config: RelayConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// One discovery pass over all configured sites.
    ///
    /// Site fetches run as independent futures joined in configuration
    /// order, so the resulting log is deterministic regardless of network
    /// timing.
    pub async fn discover(&self) -> DiscoveryOutcome {
        let fetches = self
            .config
            .sites
            .iter()
            .map(|site| self.fetch_manifest(site));
        let outcomes = join_all(fetches).await;

        let mut pool = IntentPool::new();
        let mut log = Vec::new();

        for (site, outcome) in self.config.sites.iter().zip(outcomes) {
            match outcome {
                Ok(entries) => {
                    let count = entries.len();
                    for entry in entries {
                        let intent = Intent {
                            name: entry.name,
                            description: entry.description,
                            endpoint: entry.endpoint,
                            base_url: site.base_url.clone(),
                            site: site.name.clone(),
                        };
                        let name = intent.name.clone();
                        if let Some(owner) = pool.insert(intent) {
                            tracing::warn!(intent = %name, site = %site.name, owner = %owner, "intent name conflict");
                            log.push(TraceEntry::new(
                                TraceKind::Warning,
                                format!(
                                    "Intent '{}' from {} ignored: already published by {}",
                                    name, site.name, owner
                                ),
                            ));
                        }
                    }
                    tracing::debug!(site = %site.name, count, "manifest discovered");
                    log.push(TraceEntry::new(
                        TraceKind::Success,
                        format!("Discovered {} intent(s) from {}", count, site.name),
                    ));
                }
                Err(e) => {
                    tracing::warn!(site = %site.name, error = %e, "discovery failed");
                    log.push(TraceEntry::new(
                        TraceKind::Error,
                        format!("Discovery failed for {}: {}", site.name, e),
                    ));
                }
            }
        }

        DiscoveryOutcome { pool, log }
    }

    async fn fetch_manifest(&self, site: &Site) -> Result<Vec<ManifestIntent>> {
        let url = self.config.manifest_url(site);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayError::Discovery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RelayError::Discovery(format!(
                "manifest request returned {}",
                response.status()
            )));
        }

        let manifest: Manifest = response
            .json()
            .await
            .map_err(|e| RelayError::Discovery(format!("malformed manifest: {}", e)))?;

        Ok(manifest.intents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(name: &str, site: &str) -> Intent {
        Intent {
            name: name.into(),
            description: String::new(),
            endpoint: format!("/api/{}", name),
            base_url: format!("http://{}.test", site),
            site: site.into(),
        }
    }

    #[test]
    fn test_pool_insert_and_get() {
        let mut pool = IntentPool::new();
        assert!(pool.insert(intent("get_merch_item", "merch-store")).is_none());
        assert_eq!(pool.len(), 1);

        let found = pool.get("get_merch_item").unwrap();
        assert_eq!(found.site, "merch-store");
        assert_eq!(found.base_url, "http://merch-store.test");
    }

    #[test]
    fn test_pool_first_write_wins() {
        let mut pool = IntentPool::new();
        pool.insert(intent("get_availability", "booking-desk"));

        let conflict = pool.insert(intent("get_availability", "rival-desk"));
        assert_eq!(conflict.as_deref(), Some("booking-desk"));

        // earlier site keeps the slot
        assert_eq!(pool.get("get_availability").unwrap().site, "booking-desk");
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_pool_missing_intent() {
        let pool = IntentPool::new();
        assert!(pool.get("publish_post").is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_manifest_wire_parse_ignores_extra_fields() {
        let json = r#"{
            "version": "1.0",
            "intents": [
                {"name": "get_latest_youtube_video", "description": "Latest upload", "endpoint": "/api/video", "auth": "none"}
            ]
        }"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.intents.len(), 1);
        assert_eq!(manifest.intents[0].name, "get_latest_youtube_video");
    }

    #[test]
    fn test_manifest_wire_parse_defaults_description() {
        let json = r#"{"intents": [{"name": "x", "endpoint": "/x"}]}"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.intents[0].description, "");
    }
}
