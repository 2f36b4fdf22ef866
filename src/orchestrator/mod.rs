//! The orchestration pipeline
//!
//! One invocation walks `Start → Discovering → {EvaluatingCategory}* →
//! Summarizing → Done`: discover manifests from every configured site,
//! evaluate the rule table against the command, dispatch every matched
//! action, and bundle the ordered trace with the aggregated results.
//! Nothing in the pipeline is fatal; the summary is always produced.

use crate::core::config::RelayConfig;
use crate::dispatch::ActionDispatcher;
use crate::matcher;
use crate::registry::CapabilityRegistry;
use crate::trace::{ExecutionTrace, ResultAggregator, Summary};
use futures::future::join_all;

/// Runs the discovery/matching/dispatch/aggregation pipeline.
pub struct Orchestrator {
    registry: CapabilityRegistry,
    dispatcher: ActionDispatcher,
}

impl Orchestrator {
    /// Build an orchestrator for a site configuration.
    ///
    /// Registry and dispatcher share one HTTP client; transport behavior
    /// (timeouts included) is the client's default.
    pub fn new(config: RelayConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            registry: CapabilityRegistry::with_client(config, client.clone()),
            dispatcher: ActionDispatcher::with_client(client),
        }
    }

    /// Execute one command, returning the full invocation summary.
    ///
    /// All trace and result state is created fresh here and handed back in
    /// the summary; nothing is retained across invocations.
    pub async fn run(&self, command: &str) -> Summary {
        let mut trace = ExecutionTrace::new();
        let mut aggregator = ResultAggregator::new();

        tracing::info!(command, "invocation started");
        trace.info(format!("Received command: \"{}\"", command));
        trace.info(format!(
            "Discovering capabilities from {} site(s)",
            self.registry.config().sites.len()
        ));

        let discovery = self.registry.discover().await;
        trace.extend(discovery.log);
        trace.info(format!(
            "Intent pool contains {} intent(s)",
            discovery.pool.len()
        ));

        let actions = matcher::evaluate(command, &discovery.pool);

        if actions.is_empty() {
            tracing::info!("no actionable intent matched");
            trace.warning("No actionable intent found for command");
        } else {
            // Independent dispatches, joined in rule-table order so the
            // trace stays deterministic.
            let records = join_all(actions.iter().map(|a| self.dispatcher.execute(a))).await;
            for record in records {
                trace.extend(record.log);
                aggregator.push(record.result);
            }
        }

        trace.info(format!(
            "Invocation complete: {} action(s) dispatched",
            aggregator.results().len()
        ));

        Summary::new(trace.into_entries(), aggregator.into_results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceKind;

    fn empty_config() -> RelayConfig {
        RelayConfig {
            sites: Vec::new(),
            manifest_path: "agent.json".into(),
        }
    }

    #[tokio::test]
    async fn test_no_match_yields_single_warning_and_empty_results() {
        let orchestrator = Orchestrator::new(empty_config());
        let summary = orchestrator.run("tell me a joke").await;

        assert_eq!(summary.status, "success");
        assert!(summary.results.is_empty());

        let warnings: Vec<_> = summary
            .log
            .iter()
            .filter(|e| e.kind == TraceKind::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("No actionable intent"));
    }

    #[tokio::test]
    async fn test_matched_category_without_pooled_intent_is_silent() {
        // "video" matches the rule table, but no site supplied the intent
        let orchestrator = Orchestrator::new(empty_config());
        let summary = orchestrator.run("play the latest video").await;

        assert!(summary.results.is_empty());
        // the empty-pool invocation still warns once about no action taken
        let warnings = summary
            .log
            .iter()
            .filter(|e| e.kind == TraceKind::Warning)
            .count();
        assert_eq!(warnings, 1);
        assert!(!summary
            .log
            .iter()
            .any(|e| e.kind == TraceKind::Error || e.kind == TraceKind::Action));
    }

    #[tokio::test]
    async fn test_trace_brackets_invocation() {
        let orchestrator = Orchestrator::new(empty_config());
        let summary = orchestrator.run("anything").await;

        let first = summary.log.first().unwrap();
        assert_eq!(first.kind, TraceKind::Info);
        assert!(first.message.contains("Received command"));

        let last = summary.log.last().unwrap();
        assert_eq!(last.kind, TraceKind::Info);
        assert!(last.message.contains("Invocation complete"));
    }
}
