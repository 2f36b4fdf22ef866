//! Execution trace and result aggregation
//!
//! Both sinks are append-only and owned by a single invocation: the trace
//! records every pipeline event in emission order, the aggregator collects
//! one outcome record per dispatched action. Neither is reused across
//! invocations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a trace entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    /// Pipeline progress notes (discovery started, site polled, ...)
    Info,
    /// A dispatch is about to be attempted
    Action,
    /// A dispatch or discovery step completed
    Success,
    /// A recoverable failure (site unreachable, call failed)
    Error,
    /// A non-failure anomaly (no intent matched, merge conflict)
    Warning,
}

/// One ordered observability event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub kind: TraceKind,
    pub message: String,
}

impl TraceEntry {
    pub fn new(kind: TraceKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Append-only, emission-ordered event log for one invocation
#[derive(Debug, Default)]
pub struct ExecutionTrace {
    entries: Vec<TraceEntry>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, kind: TraceKind, message: impl Into<String>) {
        self.entries.push(TraceEntry::new(kind, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.append(TraceKind::Info, message);
    }

    pub fn action(&mut self, message: impl Into<String>) {
        self.append(TraceKind::Action, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.append(TraceKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.append(TraceKind::Error, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.append(TraceKind::Warning, message);
    }

    /// Extend with pre-built entries, preserving their order
    pub fn extend(&mut self, entries: Vec<TraceEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Consume the trace at the end of an invocation
    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

/// Outcome of one dispatched action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failed,
}

/// One record per matched-and-attempted action, success or failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub intent_name: String,
    pub site: String,
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn success(intent_name: impl Into<String>, site: impl Into<String>, data: Value) -> Self {
        Self {
            intent_name: intent_name.into(),
            site: site.into(),
            status: ActionStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(
        intent_name: impl Into<String>,
        site: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            intent_name: intent_name.into(),
            site: site.into(),
            status: ActionStatus::Failed,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Ordered collection of action outcomes for one invocation
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Vec<ActionResult>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ActionResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[ActionResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ActionResult> {
        self.results
    }
}

/// The final response object for one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub status: String,
    pub log: Vec<TraceEntry>,
    pub results: Vec<ActionResult>,
}

impl Summary {
    pub fn new(log: Vec<TraceEntry>, results: Vec<ActionResult>) -> Self {
        Self {
            status: "success".into(),
            log,
            results,
        }
    }
}
