//! Step descriptions for multi-step batches with compensation.
//!
//! A batch is a list of [`Step`]s executed in order against named collections.
//! When a step fails, completed steps are undone in reverse order using each
//! step's [`Compensation`], or, for inserts without one, by deleting the
//! inserted row.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::StepAction;

/// One mutation against a named collection.
///
/// `data` is a JSON object of column values. Updates and deletes address
/// their row through `data.id`; inserts without an `id` get a generated one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Step {
    pub collection: String,
    pub action: StepAction,
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation: Option<Compensation>,
}

impl Step {
    pub fn insert(collection: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            collection: collection.into(),
            action: StepAction::Insert,
            data,
            compensation: None,
        }
    }

    pub fn update(collection: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            collection: collection.into(),
            action: StepAction::Update,
            data,
            compensation: None,
        }
    }

    pub fn delete(collection: impl Into<String>, id: &str) -> Self {
        Self {
            collection: collection.into(),
            action: StepAction::Delete,
            data: serde_json::json!({ "id": id }),
            compensation: None,
        }
    }

    /// Attach the inverse operation to run if a later step fails.
    #[must_use]
    pub fn compensate_with(mut self, compensation: Compensation) -> Self {
        self.compensation = Some(compensation);
        self
    }
}

/// The inverse of a step, supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Compensation {
    pub collection: String,
    pub action: StepAction,
    pub data: serde_json::Value,
}

/// Result of a single completed step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepOutcome {
    pub index: usize,
    pub collection: String,
    pub action: StepAction,
    /// Row the step touched (generated for inserts without an id).
    pub id: String,
    pub rows_affected: u64,
}

/// Result of a fully successful batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepsOutcome {
    pub completed: usize,
    pub results: Vec<StepOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_deserializes_without_compensation() {
        let step: Step = serde_json::from_str(
            r#"{"collection":"site_workers","action":"insert","data":{"site_id":"sit-1"}}"#,
        )
        .unwrap();
        assert_eq!(step.action, StepAction::Insert);
        assert!(step.compensation.is_none());
    }

    #[test]
    fn compensation_roundtrip() {
        let step = Step::update("sites", serde_json::json!({"id": "sit-1", "name": "B"}))
            .compensate_with(Compensation {
                collection: "sites".into(),
                action: StepAction::Update,
                data: serde_json::json!({"id": "sit-1", "name": "A"}),
            });
        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }
}
