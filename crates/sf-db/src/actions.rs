//! Request-layer boundary for the workflow.
//!
//! Each function takes plain strings and JSON as they arrive from a handler,
//! runs the matching `WorkflowService` operation, and folds the outcome into
//! an [`ActionResult`] with a user-facing message in the configured locale.
//! None of them return `Err` or panic.

use serde_json::Value;

use sf_core::entities::{AuditEntry, DailyReport};
use sf_core::errors::WorkflowError;
use sf_core::identity::Actor;
use sf_core::responses::{ActionResult, CascadeDeleteResult};
use sf_core::steps::{Step, StepsOutcome};

use crate::repos::audit::AuditInput;
use crate::service::WorkflowService;
use crate::updates::report::ReportUpdate;

fn finish<T>(svc: &WorkflowService, op: &str, result: Result<T, WorkflowError>) -> ActionResult<T> {
    if let Err(ref e) = result {
        tracing::debug!("{op} failed ({}): {e}", e.code());
    }
    ActionResult::from_result(result, svc.settings().locale)
}

pub async fn advance(
    svc: &WorkflowService,
    report_id: &str,
    acting_role: &str,
    user_id: Option<&str>,
) -> ActionResult<DailyReport> {
    let result = async {
        let actor = Actor::parse(acting_role, user_id)?;
        svc.advance(report_id, &actor).await
    }
    .await;
    finish(svc, "advance", result)
}

pub async fn reject(
    svc: &WorkflowService,
    report_id: &str,
    acting_role: &str,
    user_id: Option<&str>,
    reason: &str,
) -> ActionResult<DailyReport> {
    let result = async {
        let actor = Actor::parse(acting_role, user_id)?;
        svc.reject(report_id, &actor, reason).await
    }
    .await;
    finish(svc, "reject", result)
}

/// Apply a JSON patch map if `expected_version` is still current.
pub async fn update_if_version_matches(
    svc: &WorkflowService,
    report_id: &str,
    expected_version: i64,
    patch: Value,
    acting_role: &str,
    user_id: Option<&str>,
) -> ActionResult<DailyReport> {
    let result = async {
        let actor = Actor::parse(acting_role, user_id)?;
        let update = ReportUpdate::from_json(patch)?;
        svc.update_if_version_matches(report_id, expected_version, update, &actor)
            .await
    }
    .await;
    finish(svc, "update_if_version_matches", result)
}

pub async fn cascade_delete(
    svc: &WorkflowService,
    site_id: &str,
    acting_role: &str,
    user_id: Option<&str>,
) -> ActionResult<CascadeDeleteResult> {
    let result = async {
        let actor = Actor::parse(acting_role, user_id)?;
        svc.cascade_delete(site_id, &actor).await
    }
    .await;
    finish(svc, "cascade_delete", result)
}

pub async fn run_steps_with_rollback(
    svc: &WorkflowService,
    steps: &[Step],
    acting_role: &str,
    user_id: Option<&str>,
) -> ActionResult<StepsOutcome> {
    let result = async {
        let actor = Actor::parse(acting_role, user_id)?;
        svc.run_steps_with_rollback(steps, &actor).await
    }
    .await;
    finish(svc, "run_steps_with_rollback", result)
}

pub async fn record_audit(svc: &WorkflowService, input: AuditInput) -> ActionResult<AuditEntry> {
    let result = svc.record_audit(input).await;
    finish(svc, "record_audit", result)
}
