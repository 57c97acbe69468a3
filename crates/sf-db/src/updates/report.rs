//! Daily report update builder.
//!
//! Status and version are not patchable: status moves through the
//! transition engine and version is bumped by the write path itself.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sf_core::entities::DailyReport;
use sf_core::errors::WorkflowError;

/// Changed content fields of a daily report.
///
/// `Some(None)` on a nullable field clears it; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub weather: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub headcount: Option<Option<i64>>,
}

/// Present-but-null deserializes to `Some(None)` instead of `None`.
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl ReportUpdate {
    /// Parse a JSON patch object coming from the request layer.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` for non-objects, unknown or
    /// read-only keys, and values of the wrong type.
    pub fn from_json(patch: Value) -> Result<Self, WorkflowError> {
        if !patch.is_object() {
            return Err(WorkflowError::Validation(
                "patch must be a JSON object".into(),
            ));
        }
        serde_json::from_value(patch)
            .map_err(|e| WorkflowError::Validation(format!("invalid patch: {e}")))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.work_date.is_none()
            && self.content.is_none()
            && self.weather.is_none()
            && self.headcount.is_none()
    }

    /// Check field values before storage is touched.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` for an empty patch, blank content,
    /// or a negative headcount.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.is_empty() {
            return Err(WorkflowError::Validation("patch has no fields".into()));
        }
        if self.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(WorkflowError::Validation("content must not be blank".into()));
        }
        if matches!(self.headcount, Some(Some(h)) if h < 0) {
            return Err(WorkflowError::Validation(
                "headcount must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Column/value pairs for the SET clause, in a stable order.
    pub(crate) fn assignments(&self) -> Vec<(&'static str, libsql::Value)> {
        let mut sets = Vec::new();
        if let Some(date) = self.work_date {
            sets.push(("work_date", libsql::Value::Text(date.to_string())));
        }
        if let Some(ref content) = self.content {
            sets.push(("content", libsql::Value::Text(content.clone())));
        }
        if let Some(ref weather) = self.weather {
            sets.push((
                "weather",
                weather.clone().map_or(libsql::Value::Null, libsql::Value::Text),
            ));
        }
        if let Some(headcount) = self.headcount {
            sets.push((
                "headcount",
                headcount.map_or(libsql::Value::Null, libsql::Value::Integer),
            ));
        }
        sets
    }

    /// The current values of exactly the fields this update touches.
    #[must_use]
    pub fn snapshot_of(&self, report: &DailyReport) -> Value {
        let mut before = Map::new();
        if self.work_date.is_some() {
            before.insert("work_date".into(), Value::String(report.work_date.to_string()));
        }
        if self.content.is_some() {
            before.insert("content".into(), Value::String(report.content.clone()));
        }
        if self.weather.is_some() {
            before.insert(
                "weather".into(),
                report.weather.clone().map_or(Value::Null, Value::String),
            );
        }
        if self.headcount.is_some() {
            before.insert(
                "headcount".into(),
                report.headcount.map_or(Value::Null, Value::from),
            );
        }
        Value::Object(before)
    }
}

pub struct ReportUpdateBuilder(ReportUpdate);

impl ReportUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ReportUpdate::default())
    }

    #[must_use]
    pub const fn work_date(mut self, work_date: NaiveDate) -> Self {
        self.0.work_date = Some(work_date);
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.0.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn weather(mut self, weather: Option<String>) -> Self {
        self.0.weather = Some(weather);
        self
    }

    #[must_use]
    pub const fn headcount(mut self, headcount: Option<i64>) -> Self {
        self.0.headcount = Some(headcount);
        self
    }

    #[must_use]
    pub fn build(self) -> ReportUpdate {
        self.0
    }
}

impl Default for ReportUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
