//! Uniform response shapes returned across the workflow boundary.
//!
//! Every boundary operation resolves to an [`ActionResult`]:
//! `{"success": true, "data": ...}` or
//! `{"success": false, "error": "...", "code": "..."}`.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Site;
use crate::errors::{Locale, WorkflowError};

/// Tagged success/failure result handed to the request layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    /// Convert an error into its user-facing failure shape.
    #[must_use]
    pub fn failure(err: &WorkflowError, locale: Locale) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.user_message(locale).to_string()),
            code: Some(err.code().to_string()),
        }
    }

    #[must_use]
    pub fn from_result(result: Result<T, WorkflowError>, locale: Locale) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(&err, locale),
        }
    }
}

/// Result of deleting a site together with its dependents.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CascadeDeleteResult {
    pub parent: Site,
    /// Rows removed per dependent collection. Empty collections are omitted.
    pub deleted_entities: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_shape() {
        let result = ActionResult::ok(3u32);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 3}));
    }

    #[test]
    fn failure_shape() {
        let err = WorkflowError::Validation("reason required".into());
        let result: ActionResult<u32> = ActionResult::from_result(Err(err), Locale::En);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "Required input is missing or invalid.",
                "code": "validation_error"
            })
        );
    }
}
