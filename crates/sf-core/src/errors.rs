//! Error taxonomy for the report workflow.
//!
//! Storage-level errors (`DatabaseError`) live in `sf-db` and convert into
//! [`WorkflowError::Storage`] at the service boundary. Audit failures are not
//! represented here: they are logged and never reach a caller.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by every workflow operation.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// The acting role may not move the entity out of its current status.
    #[error("Invalid transition: cannot {action} {entity_type} {id} from {from} as {role}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        role: String,
        from: String,
        /// Requested move: `advance`, `reject`, or `delete`.
        action: String,
    },

    /// Missing or malformed input, detected before storage is touched.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The stored version moved past the version the caller observed.
    #[error("Concurrent modification: {entity_type} {id} expected version {expected}{}", .actual.map(|v| format!(", found {v}")).unwrap_or_default())]
    ConcurrentModification {
        entity_type: String,
        id: String,
        expected: i64,
        actual: Option<i64>,
    },

    /// A step of a cascade or multi-step operation failed.
    #[error("Step {step} on '{collection}' failed: {message} (compensated {compensated}, uncompensated {uncompensated})")]
    DependencyFailure {
        step: usize,
        collection: String,
        message: String,
        compensated: usize,
        uncompensated: usize,
    },

    /// The backing store rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Language for user-facing error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl WorkflowError {
    /// Stable machine-readable code, one per error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Validation(_) => "validation_error",
            Self::ConcurrentModification { .. } => "concurrent_modification",
            Self::DependencyFailure { .. } => "dependency_failure",
            Self::Storage(_) => "storage_error",
            Self::Other(_) => "internal_error",
        }
    }

    /// Short message for end users, distinct per condition.
    #[must_use]
    pub const fn user_message(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::NotFound { .. }, Locale::En) => "Not found.",
            (Self::NotFound { .. }, Locale::Ko) => "대상을 찾을 수 없습니다.",
            (Self::InvalidTransition { .. }, Locale::En) => {
                "This action is not allowed for the current status."
            }
            (Self::InvalidTransition { .. }, Locale::Ko) => "현재 상태에서는 허용되지 않는 작업입니다.",
            (Self::Validation(_), Locale::En) => "Required input is missing or invalid.",
            (Self::Validation(_), Locale::Ko) => "필수 입력값이 없거나 올바르지 않습니다.",
            (Self::ConcurrentModification { .. }, Locale::En) => {
                "Already modified by someone else. Reload and try again."
            }
            (Self::ConcurrentModification { .. }, Locale::Ko) => {
                "다른 사용자가 이미 수정했습니다. 새로고침 후 다시 시도하세요."
            }
            (Self::DependencyFailure { .. }, Locale::En) => {
                "The operation could not be completed and was rolled back."
            }
            (Self::DependencyFailure { .. }, Locale::Ko) => "작업을 완료하지 못해 되돌렸습니다.",
            (Self::Storage(_) | Self::Other(_), Locale::En) => "Something went wrong. Try again later.",
            (Self::Storage(_) | Self::Other(_), Locale::Ko) => "오류가 발생했습니다. 잠시 후 다시 시도하세요.",
        }
    }

    /// Whether the caller should reload and retry with fresh data.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// Build a `NotFound` for any entity type.
    pub fn not_found(entity_type: impl ToString, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }
}
