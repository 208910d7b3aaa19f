//! Diagnostic recording of executed requests.
//!
//! A [`DiagnosticSink`] is handed to a builder explicitly. When none is attached
//! nothing is recorded and no statement is built.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Category under which HTTP calls are recorded.
pub const HTTP_CATEGORY: &str = "http";

/// Trace of a single HTTP call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpStatement {
    /// Elapsed time, human-readable.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub status: u16,
    /// Configured timeout, human-readable.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Reserved for a failure summary; not filled in yet.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Serialized request body.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub query_params: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Reserved for a response summary; not filled in yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    pub duration: Duration,
}

fn is_zero(status: &u16) -> bool {
    *status == 0
}

/// Receives statements for observability. Never read back by the request path.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink: Send + Sync {
    /// Marks `category` as used.
    fn cat(&self, category: &str);
    fn add_statement(&self, category: &str, duration: Duration, statements: Vec<HttpStatement>);
    /// Recomputes the total time across all categories.
    fn calculate_total_time(&self);
}

/// Renders a duration the way it is shown in diagnostics, e.g. `12.5ms`.
pub fn format_duration(duration: Duration) -> String {
    format!("{:?}", duration)
}

/// Statements collected under one category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatementGroup {
    pub count: usize,
    pub duration: Duration,
    pub statements: Vec<HttpStatement>,
}

/// Serializable snapshot of a [`DebugCollector`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugReport {
    pub categories: Vec<String>,
    pub groups: BTreeMap<String, StatementGroup>,
    pub total_time: Duration,
}

/// In-memory [`DiagnosticSink`], safe to share between requests.
#[derive(Debug, Default)]
pub struct DebugCollector {
    state: Mutex<DebugReport>,
}

impl DebugCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> DebugReport {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn statements(&self, category: &str) -> Vec<HttpStatement> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .groups
            .get(category)
            .map(|group| group.statements.clone())
            .unwrap_or_default()
    }

    pub fn total_time(&self) -> Duration {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total_time
    }
}

impl DiagnosticSink for DebugCollector {
    fn cat(&self, category: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.categories.iter().any(|c| c == category) {
            state.categories.push(category.to_string());
        }
    }

    fn add_statement(&self, category: &str, duration: Duration, statements: Vec<HttpStatement>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let group = state.groups.entry(category.to_string()).or_default();
        group.count += statements.len();
        group.duration += duration;
        group.statements.extend(statements);
    }

    fn calculate_total_time(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let total: Duration = state.groups.values().map(|group| group.duration).sum();
        state.total_time = total;
    }
}
