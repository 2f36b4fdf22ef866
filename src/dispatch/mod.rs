//! Action dispatch
//!
//! One outbound HTTP call per matched action: read-style categories go out
//! as GET with the inferred parameters in the query string, write-style
//! categories as POST with a JSON body. A dispatch failure is local to its
//! action; it is recorded as a failed result and never interrupts the rest
//! of the invocation.

use crate::core::error::{RelayError, Result};
use crate::matcher::{DispatchStyle, MatchedAction};
use crate::trace::{ActionResult, TraceEntry, TraceKind};
use reqwest::Client;
use serde_json::Value;

/// Trace entry pair plus the outcome record for one dispatch attempt
#[derive(Debug)]
pub struct DispatchRecord {
    /// Exactly two entries: the action entry, then success or error
    pub log: Vec<TraceEntry>,
    pub result: ActionResult,
}

/// Executes matched intents against their resolved site endpoints.
pub struct ActionDispatcher {
    client: Client,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Execute one matched action, producing its trace pair and result.
    pub async fn execute(&self, action: &MatchedAction) -> DispatchRecord {
        let url = endpoint_url(&action.intent.base_url, &action.intent.endpoint);
        let mut log = vec![TraceEntry::new(
            TraceKind::Action,
            format!(
                "Executing {} ({}) against {}",
                action.intent.name, action.category, action.intent.site
            ),
        )];

        match self.call(&url, action).await {
            Ok(data) => {
                tracing::debug!(intent = %action.intent.name, %url, "dispatch succeeded");
                log.push(TraceEntry::new(
                    TraceKind::Success,
                    format!("{} completed on {}", action.intent.name, action.intent.site),
                ));
                DispatchRecord {
                    log,
                    result: ActionResult::success(
                        action.intent.name.clone(),
                        action.intent.site.clone(),
                        data,
                    ),
                }
            }
            Err(e) => {
                tracing::warn!(intent = %action.intent.name, %url, error = %e, "dispatch failed");
                let message = e.to_string();
                log.push(TraceEntry::new(
                    TraceKind::Error,
                    format!(
                        "{} failed on {}: {}",
                        action.intent.name, action.intent.site, message
                    ),
                ));
                DispatchRecord {
                    log,
                    result: ActionResult::failed(
                        action.intent.name.clone(),
                        action.intent.site.clone(),
                        message,
                    ),
                }
            }
        }
    }

    async fn call(&self, url: &str, action: &MatchedAction) -> Result<Value> {
        let request = match action.style {
            DispatchStyle::Query => self.client.get(url).query(&query_pairs(&action.params)),
            DispatchStyle::JsonBody => self.client.post(url).json(&action.params),
        };

        let response = request
            .send()
            .await
            .map_err(|e| RelayError::Dispatch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RelayError::Dispatch(format!(
                "endpoint returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| RelayError::Dispatch(format!("malformed response body: {}", e)))
    }
}

/// Join a site base URL and an intent endpoint path.
fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}/{}", base, endpoint)
    }
}

/// Flatten a parameter object into query pairs.
///
/// String values go out verbatim; everything else is serialized compactly.
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Some(map) = params.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}
