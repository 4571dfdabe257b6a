//! Destinations for failure diagnostics.

use super::{Diagnostic, Severity};
use std::sync::Mutex;

/// Fire-and-forget receiver of diagnostics.
///
/// Implementations must not fail the caller: a sink that cannot deliver
/// drops the record after logging locally.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, diagnostic: &Diagnostic);
}

/// Emits diagnostics as structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, diagnostic: &Diagnostic) {
        let context = serde_json::to_string(&diagnostic.context)
            .unwrap_or_else(|e| format!("<unserializable context: {}>", e));
        match diagnostic.severity {
            Severity::Error => tracing::error!(
                code = %diagnostic.code,
                category = %diagnostic.category,
                context = %context,
                "{}",
                diagnostic.message
            ),
            Severity::Warning => tracing::warn!(
                code = %diagnostic.code,
                category = %diagnostic.category,
                context = %context,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Keeps every recorded diagnostic in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, diagnostic: &Diagnostic) {
        match self.records.lock() {
            Ok(mut records) => records.push(diagnostic.clone()),
            Err(poisoned) => poisoned.into_inner().push(diagnostic.clone()),
        }
    }
}
