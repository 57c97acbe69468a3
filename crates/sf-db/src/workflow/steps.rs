//! Ordered multi-step batches with compensation.
//!
//! Steps run one at a time against named collections. On the first failure,
//! completed steps are undone newest-first: a caller-supplied
//! [`Compensation`](sf_core::steps::Compensation) runs as given, an insert without one is undone by
//! deleting the row it created, and anything else is counted as
//! uncompensated.
//!
//! Steps cannot touch the audit log, delete reports, or write the report
//! columns that the transition engine and version guard own. An update or
//! delete that matches no row counts as a failed step.

use serde_json::{Map, Value};

use sf_core::audit_detail::StepsCompensatedDetail;
use sf_core::enums::{AuditAction, EntityType, StepAction};
use sf_core::errors::WorkflowError;
use sf_core::identity::Actor;
use sf_core::ids::{PREFIX_ROW, PREFIX_STEP_BATCH};
use sf_core::steps::{Step, StepOutcome, StepsOutcome};

use crate::error::DatabaseError;
use crate::events::WorkflowEvent;
use crate::helpers::{json_to_value, to_json, validate_identifier};
use crate::repos::audit::AuditInput;
use crate::service::WorkflowService;

fn object_data<'a>(collection: &str, data: &'a Value) -> Result<&'a Map<String, Value>, DatabaseError> {
    data.as_object().ok_or_else(|| {
        DatabaseError::InvalidState(format!("step data for {collection} must be a JSON object"))
    })
}

fn row_id(collection: &str, data: &Map<String, Value>) -> Result<String, DatabaseError> {
    match data.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(DatabaseError::InvalidState(format!(
            "step on {collection} needs a string id"
        ))),
    }
}

/// Tables no step may touch. The audit log is written only by the workflow.
const SEALED_COLLECTIONS: &[&str] = &["audit_log"];

/// Report columns owned by the transition engine and the version guard.
const REPORT_WORKFLOW_COLUMNS: &[&str] = &[
    "status",
    "version",
    "submitted_at",
    "manager_approved_at",
    "approved_at",
    "rejected_at",
    "rejection_reason",
];

/// Refuse steps that would write around the transition engine or the audit log.
///
/// Report rows may be inserted and have their content edited, but their
/// lifecycle columns are off limits and they are never deleted by a step.
fn check_step_target(
    collection: &str,
    action: StepAction,
    fields: &Map<String, Value>,
) -> Result<(), DatabaseError> {
    if SEALED_COLLECTIONS
        .iter()
        .any(|sealed| collection.eq_ignore_ascii_case(sealed))
    {
        return Err(DatabaseError::InvalidState(format!(
            "steps may not write to {collection}"
        )));
    }
    if !collection.eq_ignore_ascii_case("daily_reports") {
        return Ok(());
    }
    if action == StepAction::Delete {
        return Err(DatabaseError::InvalidState(
            "steps may not delete daily reports".into(),
        ));
    }
    if let Some(column) = fields.keys().find(|column| {
        REPORT_WORKFLOW_COLUMNS
            .iter()
            .any(|owned| column.eq_ignore_ascii_case(owned))
    }) {
        return Err(DatabaseError::InvalidState(format!(
            "daily_reports.{column} changes only through advance, reject, or a version-checked update"
        )));
    }
    Ok(())
}

impl WorkflowService {
    /// Check and run one mutation. `index` is only used to label the outcome.
    async fn execute_step(
        &self,
        index: usize,
        collection: &str,
        action: StepAction,
        data: &Value,
    ) -> Result<StepOutcome, DatabaseError> {
        validate_identifier(collection)?;
        let fields = object_data(collection, data)?;
        for column in fields.keys() {
            validate_identifier(column)?;
        }
        check_step_target(collection, action, fields)?;
        self.apply_step(index, collection, action, fields).await
    }

    /// Run one already-checked mutation.
    ///
    /// An update or delete that matches no row fails the step.
    async fn apply_step(
        &self,
        index: usize,
        collection: &str,
        action: StepAction,
        fields: &Map<String, Value>,
    ) -> Result<StepOutcome, DatabaseError> {
        let (id, rows_affected) = match action {
            StepAction::Insert => {
                let id = match fields.get("id") {
                    Some(_) => row_id(collection, fields)?,
                    None => self.db().generate_id(PREFIX_ROW).await?,
                };
                let mut columns = vec!["id".to_string()];
                let mut params = vec![libsql::Value::Text(id.clone())];
                for (column, value) in fields.iter().filter(|(k, _)| k.as_str() != "id") {
                    columns.push(column.clone());
                    params.push(json_to_value(value));
                }
                let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("?{i}")).collect();
                let sql = format!(
                    "INSERT INTO {collection} ({}) VALUES ({})",
                    columns.join(", "),
                    placeholders.join(", ")
                );
                let n = self.db().execute(&sql, libsql::params_from_iter(params)).await?;
                (id, n)
            }
            StepAction::Update => {
                let id = row_id(collection, fields)?;
                let mut sets = Vec::new();
                let mut params = Vec::new();
                for (column, value) in fields.iter().filter(|(k, _)| k.as_str() != "id") {
                    params.push(json_to_value(value));
                    sets.push(format!("{column} = ?{}", params.len()));
                }
                if sets.is_empty() {
                    return Err(DatabaseError::InvalidState(format!(
                        "update on {collection} has no fields"
                    )));
                }
                params.push(libsql::Value::Text(id.clone()));
                let sql = format!(
                    "UPDATE {collection} SET {} WHERE id = ?{}",
                    sets.join(", "),
                    params.len()
                );
                let n = self.db().execute(&sql, libsql::params_from_iter(params)).await?;
                (id, n)
            }
            StepAction::Delete => {
                let id = row_id(collection, fields)?;
                let n = self
                    .db()
                    .execute(&format!("DELETE FROM {collection} WHERE id = ?1"), [id.as_str()])
                    .await?;
                (id, n)
            }
        };

        if rows_affected == 0 && action != StepAction::Insert {
            return Err(DatabaseError::InvalidState(format!(
                "{action} on {collection} matched no row with id {id}"
            )));
        }

        Ok(StepOutcome {
            index,
            collection: collection.to_string(),
            action,
            id,
            rows_affected,
        })
    }

    /// Undo completed steps newest-first. Returns `(compensated, uncompensated)`.
    async fn compensate(&self, steps: &[Step], completed: &[StepOutcome]) -> (usize, usize) {
        let mut compensated = 0;
        let mut uncompensated = 0;

        for outcome in completed.iter().rev() {
            let step = &steps[outcome.index];
            let result = match (&step.compensation, step.action) {
                (Some(c), _) => {
                    self.execute_step(outcome.index, &c.collection, c.action, &c.data)
                        .await
                }
                // Removing the row this batch inserted; already checked on the way in.
                (None, StepAction::Insert) => {
                    let mut key = Map::new();
                    key.insert("id".into(), Value::String(outcome.id.clone()));
                    self.apply_step(outcome.index, &outcome.collection, StepAction::Delete, &key)
                        .await
                }
                (None, _) => {
                    tracing::warn!(
                        "step {} ({} on {}) has no compensation",
                        outcome.index,
                        outcome.action,
                        outcome.collection
                    );
                    uncompensated += 1;
                    continue;
                }
            };

            match result {
                Ok(_) => compensated += 1,
                Err(e) => {
                    tracing::warn!("compensation for step {} failed: {e}", outcome.index);
                    uncompensated += 1;
                }
            }
        }

        (compensated, uncompensated)
    }

    /// Record a `steps_compensated` entry. Failures are logged, never returned.
    async fn audit_rollback(
        &self,
        completed: &[StepOutcome],
        detail: &StepsCompensatedDetail,
        actor: &Actor,
    ) {
        let input = async {
            let batch_id = self.db().generate_id(PREFIX_STEP_BATCH).await?;
            Ok::<_, WorkflowError>(
                AuditInput::new(EntityType::StepBatch, batch_id, AuditAction::StepsCompensated)
                    .by(actor.user_id.as_deref())
                    .changes(to_json(&completed)?)
                    .metadata(to_json(detail)?),
            )
        }
        .await;

        match input {
            Ok(input) => self.emit_audit(input).await,
            Err(e) => tracing::warn!("could not audit rollback of step {}: {e}", detail.failed_step),
        }
    }

    /// Run `steps` in order, undoing completed ones if any step fails.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::DependencyFailure` with the failing step's
    /// index and collection and the compensation counts. Steps after the
    /// failing one never run.
    pub async fn run_steps_with_rollback(
        &self,
        steps: &[Step],
        actor: &Actor,
    ) -> Result<StepsOutcome, WorkflowError> {
        let mut completed: Vec<StepOutcome> = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            match self
                .execute_step(index, &step.collection, step.action, &step.data)
                .await
            {
                Ok(outcome) => {
                    tracing::debug!(
                        "step {index}: {} on {} ({} rows)",
                        step.action,
                        step.collection,
                        outcome.rows_affected
                    );
                    completed.push(outcome);
                }
                Err(e) => {
                    let (compensated, uncompensated) = self.compensate(steps, &completed).await;
                    tracing::warn!(
                        "step {index} on {} failed, compensated {compensated}, uncompensated {uncompensated}: {e}",
                        step.collection
                    );

                    let detail = StepsCompensatedDetail {
                        failed_step: index,
                        collection: step.collection.clone(),
                        error: e.to_string(),
                        compensated,
                        uncompensated,
                    };
                    self.audit_rollback(&completed, &detail, actor).await;
                    self.publish(WorkflowEvent::StepsCompensated {
                        failed_step: index,
                        compensated,
                        uncompensated,
                    });

                    return Err(WorkflowError::DependencyFailure {
                        step: index,
                        collection: step.collection.clone(),
                        message: e.to_string(),
                        compensated,
                        uncompensated,
                    });
                }
            }
        }

        Ok(StepsOutcome {
            completed: completed.len(),
            results: completed,
        })
    }
}
