//! Diagnostic sinks for the login workflow.
//!
//! The workflow never logs through a global; it reports to an injected
//! [`DiagnosticSink`]. [`TracingSink`] forwards to `tracing` and is the
//! default. [`RecordingSink`] keeps every entry in memory so callers can
//! assert on what was reported.

use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Error,
}

/// Receiver for workflow diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn debug(&self, message: &str);
    fn error(&self, message: &str);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn debug(&self, message: &str) {
        (**self).debug(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Forwards diagnostics to `tracing` under the `formauth` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "formauth", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "formauth", "{message}");
    }
}

/// A captured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

/// In-memory sink that records every diagnostic in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, message: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(Diagnostic {
            level,
            message: message.to_string(),
        });
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Messages recorded at `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|d| d.level == level)
            .map(|d| d.message)
            .collect()
    }

    /// Number of entries at `level` whose message contains `needle`.
    pub fn count(&self, level: Level, needle: &str) -> usize {
        self.messages(level)
            .iter()
            .filter(|m| m.contains(needle))
            .count()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
