//! Workflow events published after successful mutations.
//!
//! Delivered over a `tokio::sync::broadcast` channel so notification
//! consumers can subscribe without the workflow knowing about them. Events
//! are only sent after the write they describe has landed.

use std::collections::BTreeMap;

use serde::Serialize;
use sf_core::enums::ReportStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
    ReportCreated {
        report_id: String,
        site_id: String,
    },
    ReportTransitioned {
        report_id: String,
        from: ReportStatus,
        to: ReportStatus,
        user_id: Option<String>,
    },
    ReportRejected {
        report_id: String,
        from: ReportStatus,
        reason: String,
        user_id: Option<String>,
    },
    ReportUpdated {
        report_id: String,
        version: i64,
    },
    ReportDeleted {
        report_id: String,
    },
    SiteCascadeDeleted {
        site_id: String,
        deleted_entities: BTreeMap<String, u64>,
    },
    StepsCompensated {
        failed_step: usize,
        compensated: usize,
        uncompensated: usize,
    },
}

impl WorkflowEvent {
    /// Short name used in log lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ReportCreated { .. } => "report_created",
            Self::ReportTransitioned { .. } => "report_transitioned",
            Self::ReportRejected { .. } => "report_rejected",
            Self::ReportUpdated { .. } => "report_updated",
            Self::ReportDeleted { .. } => "report_deleted",
            Self::SiteCascadeDeleted { .. } => "site_cascade_deleted",
            Self::StepsCompensated { .. } => "steps_compensated",
        }
    }
}
