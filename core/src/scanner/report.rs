use serde_json::Value;
use std::collections::HashMap;

use super::{is_empty_value, ScanOutcome, ScannerError};

/// Aggregated outcome of one scan invocation.
///
/// An identifier is never a key of both `results` and `errors`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub results: HashMap<String, Value>,
    pub errors: HashMap<String, ScannerError>,
    /// Scanners suppressed by the filter, in registration order
    pub skipped: Vec<String>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one scanner outcome. Empty successes are dropped.
    pub fn record(&mut self, identifier: String, outcome: ScanOutcome) {
        match outcome {
            Err(err) => {
                self.results.remove(&identifier);
                self.errors.insert(identifier, err);
            }
            Ok(value) if is_empty_value(&value) => {
                tracing::debug!(scanner = %identifier, "Scanner returned no data");
            }
            Ok(Some(value)) => {
                self.errors.remove(&identifier);
                self.results.insert(identifier, value);
            }
            Ok(None) => {}
        }
    }

    /// Fold a later report into this one, keeping the exclusivity rule.
    pub fn merge(&mut self, other: ScanReport) {
        for (identifier, value) in other.results {
            self.record(identifier, Ok(Some(value)));
        }
        for (identifier, err) in other.errors {
            self.record(identifier, Err(err));
        }
        for identifier in other.skipped {
            if !self.skipped.contains(&identifier) {
                self.skipped.push(identifier);
            }
        }
    }

    pub fn result(&self, identifier: &str) -> Option<&Value> {
        self.results.get(identifier)
    }

    pub fn error(&self, identifier: &str) -> Option<&ScannerError> {
        self.errors.get(identifier)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.errors.is_empty()
    }

    /// Number of recorded outcomes (results plus errors)
    pub fn len(&self) -> usize {
        self.results.len() + self.errors.len()
    }
}
