use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DocumentKind;

/// A construction site. Parent of reports, worker assignments, and documents.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assignment of a worker to a site.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SiteWorker {
    pub id: String,
    pub site_id: String,
    pub worker_id: String,
    pub role: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

/// A document or invoice filed against a site.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SiteDocument {
    pub id: String,
    pub site_id: String,
    pub title: String,
    pub kind: DocumentKind,
    /// Invoice amount in the smallest currency unit.
    pub amount: Option<i64>,
    pub created_at: DateTime<Utc>,
}
