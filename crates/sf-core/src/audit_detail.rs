//! Typed audit payloads.
//!
//! Each audit action carries a structured `changes` JSON blob. These types
//! pin down its shape for the common actions.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `changes` for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
}

/// `metadata` for a rejection.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RejectionMetadata {
    pub reason: String,
    pub role: String,
}

/// `changes` for `AuditAction::Updated`: only the patched fields appear.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UpdatedDetail {
    pub before: serde_json::Value,
    pub after: serde_json::Value,
    pub version: VersionChange,
}

/// Version bump recorded with an update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VersionChange {
    pub from: i64,
    pub to: i64,
}

/// `changes` for `AuditAction::CascadeDeleted`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CascadeDeletedDetail {
    pub deleted_entities: BTreeMap<String, u64>,
}

/// `metadata` for `AuditAction::StepsCompensated`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepsCompensatedDetail {
    pub failed_step: usize,
    pub collection: String,
    pub error: String,
    pub compensated: usize,
    pub uncompensated: usize,
}
