//! Log entry structure

use super::log_level::EntryKind;
use super::payload::Payload;

/// A single log call, built per emit and consumed immediately
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub kind: EntryKind,
    pub identifier: String,
    pub payload: Payload,
}

impl LogEntry {
    pub fn new(kind: EntryKind, payload: Payload) -> Self {
        Self {
            kind,
            identifier: String::new(),
            payload,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// `LABEL(identifier): payload`, or `LABEL: payload` when no identifier is set
    pub(crate) fn compose(&self, rendered_payload: &str) -> String {
        if self.identifier.is_empty() {
            format!("{}: {}", self.kind.label(), rendered_payload)
        } else {
            format!(
                "{}({}): {}",
                self.kind.label(),
                self.identifier,
                rendered_payload
            )
        }
    }
}
