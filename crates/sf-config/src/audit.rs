//! Audit log configuration.

use serde::{Deserialize, Serialize};

/// Default buffer of the workflow event channel.
const fn default_event_capacity() -> usize {
    64
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Directory for the JSONL audit journal. Empty disables the journal.
    #[serde(default)]
    pub journal_dir: String,

    /// Capacity of the broadcast channel carrying workflow events.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            journal_dir: String::new(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl AuditConfig {
    pub fn has_journal(&self) -> bool {
        !self.journal_dir.is_empty()
    }
}
