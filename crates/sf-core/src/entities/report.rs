use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ReportStatus;

/// A daily work report submitted for a site and reviewed in two stages.
///
/// `status` only changes through the transition engine; content fields only
/// through the version-checked update path. Both bump `version`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DailyReport {
    pub id: String,
    pub site_id: String,
    pub created_by: String,
    pub work_date: NaiveDate,
    pub content: String,
    pub weather: Option<String>,
    pub headcount: Option<i64>,
    pub status: ReportStatus,
    pub version: i64,
    pub submitted_at: Option<DateTime<Utc>>,
    pub manager_approved_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    /// Present iff `status` is `rejected`.
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyReport {
    /// Check the rejection-reason invariant.
    #[must_use]
    pub fn rejection_reason_consistent(&self) -> bool {
        let has_reason = self
            .rejection_reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        has_reason == (self.status == ReportStatus::Rejected)
    }
}
