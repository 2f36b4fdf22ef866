//! Intent Relay - capability discovery and intent dispatch orchestrator

pub mod core;
pub mod dispatch;
pub mod matcher;
pub mod orchestrator;
pub mod registry;
pub mod trace;
