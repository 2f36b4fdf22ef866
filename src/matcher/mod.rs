//! Intent matching
//!
//! A command is tested against an ordered table of independent category
//! rules. Matching is deliberately literal: each rule is an OR over fixed
//! substrings of the lower-cased command text, not natural-language
//! understanding. Rules are not mutually exclusive, so one command can
//! trigger several categories, and a rule whose target intent was never
//! discovered simply contributes no action.

pub mod params;

use crate::registry::{Intent, IntentPool};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One independent matching category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Video,
    Merch,
    Availability,
    Publish,
    Scheduling,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "video",
            Self::Merch => "merch",
            Self::Availability => "availability",
            Self::Publish => "publish",
            Self::Scheduling => "scheduling",
        };
        write!(f, "{}", name)
    }
}

/// How a matched intent's parameters travel on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStyle {
    /// GET with parameters as a query string
    Query,
    /// POST with parameters as a JSON body
    JsonBody,
}

/// One row of the rule table: predicate, target intent, parameter builder
pub struct CategoryRule {
    pub category: Category,
    /// Predicate: any of these substrings in the lower-cased command
    pub keywords: &'static [&'static str],
    /// Intent name to look up in the merged pool
    pub intent: &'static str,
    pub style: DispatchStyle,
    pub build_params: fn(&str) -> Value,
}

impl CategoryRule {
    /// Test the predicate against an already lower-cased command
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// The canonical rule table, evaluated top to bottom
pub const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Video,
        keywords: &["video", "youtube"],
        intent: "get_latest_youtube_video",
        style: DispatchStyle::Query,
        build_params: params::video_params,
    },
    CategoryRule {
        category: Category::Merch,
        keywords: &["merch", "t-shirt", "mug"],
        intent: "get_merch_item",
        style: DispatchStyle::Query,
        build_params: params::merch_params,
    },
    CategoryRule {
        category: Category::Availability,
        keywords: &["availability", "check date"],
        intent: "get_availability",
        style: DispatchStyle::Query,
        build_params: params::availability_params,
    },
    CategoryRule {
        category: Category::Publish,
        keywords: &["publish", "post", "social media"],
        intent: "publish_post",
        style: DispatchStyle::JsonBody,
        build_params: params::publish_params,
    },
    CategoryRule {
        category: Category::Scheduling,
        keywords: &["book interview", "schedule"],
        intent: "book_interview",
        style: DispatchStyle::JsonBody,
        build_params: params::scheduling_params,
    },
];

/// Categories whose predicate matches the command, in rule-table order.
///
/// Pure over the command text; used by the pipeline and directly testable.
pub fn matching_categories(command: &str) -> Vec<Category> {
    let lowered = command.to_lowercase();
    RULES
        .iter()
        .filter(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
        .collect()
}

/// A matched category resolved against the pool, ready to dispatch
#[derive(Debug, Clone)]
pub struct MatchedAction {
    pub category: Category,
    pub intent: Intent,
    pub style: DispatchStyle,
    pub params: Value,
}

/// Evaluate every rule against the command and the discovered pool.
///
/// A rule contributes at most one action; a matching rule whose intent is
/// absent from the pool contributes none. The caller decides what to do
/// when the returned list is empty.
pub fn evaluate(command: &str, pool: &IntentPool) -> Vec<MatchedAction> {
    let lowered = command.to_lowercase();
    let mut actions = Vec::new();

    for rule in RULES {
        if !rule.matches(&lowered) {
            continue;
        }
        let Some(intent) = pool.get(rule.intent) else {
            tracing::debug!(category = %rule.category, intent = rule.intent, "matched category has no discovered intent");
            continue;
        };
        actions.push(MatchedAction {
            category: rule.category,
            intent: intent.clone(),
            style: rule.style,
            params: (rule.build_params)(command),
        });
    }

    actions
}
