//! Workflow policy configuration.

use serde::{Deserialize, Serialize};
use sf_core::transitions::RejectPolicy;

/// Default probe size per dependent collection during cascade delete.
const fn default_cascade_fetch_limit() -> u32 {
    1000
}

fn default_cascade_collections() -> Vec<String> {
    vec![
        "daily_reports".to_string(),
        "site_workers".to_string(),
        "site_documents".to_string(),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Whether `reject` checks the current status.
    #[serde(default)]
    pub reject_policy: RejectPolicy,

    /// Dependent collections removed before a site, in order.
    #[serde(default = "default_cascade_collections")]
    pub cascade_collections: Vec<String>,

    /// Rows probed per collection before deleting.
    #[serde(default = "default_cascade_fetch_limit")]
    pub cascade_fetch_limit: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            reject_policy: RejectPolicy::default(),
            cascade_collections: default_cascade_collections(),
            cascade_fetch_limit: default_cascade_fetch_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = WorkflowConfig::default();
        assert_eq!(config.reject_policy, RejectPolicy::AnyStatus);
        assert_eq!(
            config.cascade_collections,
            ["daily_reports", "site_workers", "site_documents"]
        );
        assert_eq!(config.cascade_fetch_limit, 1000);
    }
}
