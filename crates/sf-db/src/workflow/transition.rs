//! Status transition engine: `advance` and `reject`.
//!
//! The next status comes from [`sf_core::transitions`]; the write goes
//! through the version-checked path in [`super::guard`], so two concurrent
//! transitions of the same report cannot both land.

use sf_core::audit_detail::{RejectionMetadata, StatusChangedDetail};
use sf_core::entities::DailyReport;
use sf_core::enums::{AuditAction, EntityType, ReportStatus, Role};
use sf_core::errors::WorkflowError;
use sf_core::identity::Actor;
use sf_core::transitions::{can_reject, transition_for};

use crate::events::WorkflowEvent;
use crate::helpers::to_json;
use crate::repos::audit::AuditInput;
use crate::service::WorkflowService;

fn invalid_transition(report: &DailyReport, role: Role, action: &str) -> WorkflowError {
    WorkflowError::InvalidTransition {
        entity_type: EntityType::DailyReport.to_string(),
        id: report.id.clone(),
        role: role.to_string(),
        from: report.status.to_string(),
        action: action.to_string(),
    }
}

fn now_text() -> libsql::Value {
    libsql::Value::Text(chrono::Utc::now().to_rfc3339())
}

impl WorkflowService {
    /// Move a report one step forward in its lifecycle.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::NotFound` if the report does not exist.
    /// - `WorkflowError::InvalidTransition` if `(role, status)` is not in the
    ///   transition table. Nothing is written.
    /// - `WorkflowError::ConcurrentModification` if another write landed first.
    pub async fn advance(
        &self,
        report_id: &str,
        actor: &Actor,
    ) -> Result<DailyReport, WorkflowError> {
        let current = self.get_report(report_id).await?;
        let Some(next) = transition_for(actor.role, current.status) else {
            tracing::debug!(
                "advance refused for {report_id}: {} from {}",
                actor.role,
                current.status
            );
            return Err(invalid_transition(&current, actor.role, "advance"));
        };

        let mut sets = vec![("status", libsql::Value::Text(next.as_str().to_string()))];
        match next {
            ReportStatus::PendingApproval => {
                sets.push(("submitted_at", now_text()));
                if current.status == ReportStatus::Rejected {
                    sets.push(("rejection_reason", libsql::Value::Null));
                }
            }
            ReportStatus::ApprovedByManager => sets.push(("manager_approved_at", now_text())),
            ReportStatus::FinalApproved => sets.push(("approved_at", now_text())),
            ReportStatus::Draft | ReportStatus::Rejected => {}
        }

        self.write_if_version(report_id, current.version, sets).await?;
        let updated = self.get_report(report_id).await?;
        tracing::debug!("report {report_id}: {} -> {next}", current.status);

        self.emit_audit(
            AuditInput::new(EntityType::DailyReport, report_id, AuditAction::StatusChanged)
                .by(actor.user_id.as_deref())
                .changes(to_json(&StatusChangedDetail {
                    from: current.status.to_string(),
                    to: next.to_string(),
                })?)
                .metadata(serde_json::json!({ "role": actor.role })),
        )
        .await;
        self.publish(WorkflowEvent::ReportTransitioned {
            report_id: report_id.to_string(),
            from: current.status,
            to: next,
            user_id: actor.user_id.clone(),
        });

        Ok(updated)
    }

    /// Reject a report with a reason.
    ///
    /// Which statuses may be rejected is governed by the configured
    /// [`RejectPolicy`](sf_core::transitions::RejectPolicy).
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Validation` if `reason` is blank. Storage is not touched.
    /// - `WorkflowError::NotFound` if the report does not exist.
    /// - `WorkflowError::InvalidTransition` if the role may not reject, or the
    ///   policy forbids rejecting the current status.
    /// - `WorkflowError::ConcurrentModification` if another write landed first.
    pub async fn reject(
        &self,
        report_id: &str,
        actor: &Actor,
        reason: &str,
    ) -> Result<DailyReport, WorkflowError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::Validation(
                "a rejection reason is required".into(),
            ));
        }

        let current = self.get_report(report_id).await?;
        if !can_reject(actor.role, current.status, self.settings().reject_policy) {
            return Err(invalid_transition(&current, actor.role, "reject"));
        }

        let sets = vec![
            (
                "status",
                libsql::Value::Text(ReportStatus::Rejected.as_str().to_string()),
            ),
            ("rejection_reason", libsql::Value::Text(reason.to_string())),
            ("rejected_at", now_text()),
        ];
        self.write_if_version(report_id, current.version, sets).await?;
        let updated = self.get_report(report_id).await?;
        tracing::debug!("report {report_id}: {} -> rejected", current.status);

        self.emit_audit(
            AuditInput::new(EntityType::DailyReport, report_id, AuditAction::StatusChanged)
                .by(actor.user_id.as_deref())
                .changes(to_json(&StatusChangedDetail {
                    from: current.status.to_string(),
                    to: ReportStatus::Rejected.to_string(),
                })?)
                .metadata(to_json(&RejectionMetadata {
                    reason: reason.to_string(),
                    role: actor.role.to_string(),
                })?),
        )
        .await;
        self.publish(WorkflowEvent::ReportRejected {
            report_id: report_id.to_string(),
            from: current.status,
            reason: reason.to_string(),
            user_id: actor.user_id.clone(),
        });

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::service::WorkflowSettings;
    use crate::test_support::helpers::{
        admin, manager, seed_report, test_service, test_service_with, worker,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sf_core::transitions::RejectPolicy;

    #[tokio::test]
    async fn worker_submits_draft() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;

        let submitted = svc.advance(&report.id, &worker()).await.unwrap();
        assert_eq!(submitted.status, ReportStatus::PendingApproval);
        assert_eq!(submitted.version, 2);
        assert!(submitted.submitted_at.is_some());
        assert!(submitted.manager_approved_at.is_none());
    }

    #[rstest]
    #[case::manager_on_draft(Role::SiteManager)]
    #[case::admin_on_draft(Role::Admin)]
    #[tokio::test]
    async fn reviewers_cannot_submit(#[case] role: Role) {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;

        let err = svc
            .advance(&report.id, &Actor::anonymous(role))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_transition");
        assert_eq!(svc.get_report(&report.id).await.unwrap(), report);
    }

    #[tokio::test]
    async fn repeating_an_advance_fails() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        svc.advance(&report.id, &worker()).await.unwrap();
        let err = svc.advance(&report.id, &worker()).await.unwrap_err();
        assert_eq!(err.code(), "invalid_transition");
    }

    #[tokio::test]
    async fn advance_missing_report() {
        let svc = test_service().await;
        let err = svc.advance("rpt-missing", &worker()).await.unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[tokio::test]
    async fn blank_reason_never_touches_storage() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        svc.advance(&report.id, &worker()).await.unwrap();
        let before = svc.get_report(&report.id).await.unwrap();

        for reason in ["", "   ", "\n\t"] {
            let err = svc.reject(&report.id, &manager(), reason).await.unwrap_err();
            assert_eq!(err.code(), "validation_error");
        }
        // Blank reason is checked before the report is even looked up.
        let err = svc.reject("rpt-missing", &manager(), " ").await.unwrap_err();
        assert_eq!(err.code(), "validation_error");

        assert_eq!(svc.get_report(&report.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn worker_cannot_reject() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        let err = svc
            .reject(&report.id, &worker(), "not mine to reject")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_transition");
    }

    #[tokio::test]
    async fn reject_then_resubmit_clears_reason() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        svc.advance(&report.id, &worker()).await.unwrap();

        let rejected = svc
            .reject(&report.id, &manager(), "  Missing photos  ")
            .await
            .unwrap();
        assert_eq!(rejected.status, ReportStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Missing photos"));
        assert!(rejected.rejected_at.is_some());
        assert!(rejected.rejection_reason_consistent());

        let resubmitted = svc.advance(&report.id, &worker()).await.unwrap();
        assert_eq!(resubmitted.status, ReportStatus::PendingApproval);
        assert_eq!(resubmitted.rejection_reason, None);
        assert!(resubmitted.rejected_at.is_some());
        assert!(resubmitted.rejection_reason_consistent());
        assert_eq!(resubmitted.version, 4);
    }

    #[tokio::test]
    async fn any_status_policy_allows_rejecting_final_approved() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        svc.advance(&report.id, &worker()).await.unwrap();
        svc.advance(&report.id, &manager()).await.unwrap();
        svc.advance(&report.id, &admin()).await.unwrap();

        let rejected = svc
            .reject(&report.id, &admin(), "Wrong site")
            .await
            .unwrap();
        assert_eq!(rejected.status, ReportStatus::Rejected);
    }

    #[tokio::test]
    async fn reviewable_only_policy_blocks_final_approved() {
        let svc = test_service_with(WorkflowSettings {
            reject_policy: RejectPolicy::ReviewableOnly,
            ..WorkflowSettings::default()
        })
        .await;
        let (_, report) = seed_report(&svc).await;

        let err = svc
            .reject(&report.id, &manager(), "Too early")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_transition");

        svc.advance(&report.id, &worker()).await.unwrap();
        svc.reject(&report.id, &manager(), "Blurry photos")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejection_is_audited_with_reason() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        svc.advance(&report.id, &worker()).await.unwrap();
        svc.reject(&report.id, &manager(), "Missing photos")
            .await
            .unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(report.id.clone()),
                action: Some(AuditAction::StatusChanged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        let latest = &entries[0];
        assert_eq!(
            latest.changes,
            Some(serde_json::json!({"from": "pending_approval", "to": "rejected"}))
        );
        assert_eq!(
            latest.metadata,
            Some(serde_json::json!({"reason": "Missing photos", "role": "site_manager"}))
        );
        assert_eq!(latest.user_id.as_deref(), Some("usr-manager"));
    }

    #[tokio::test]
    async fn transition_publishes_event() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        let mut events = svc.subscribe();

        svc.advance(&report.id, &worker()).await.unwrap();
        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            WorkflowEvent::ReportTransitioned {
                report_id: report.id.clone(),
                from: ReportStatus::Draft,
                to: ReportStatus::PendingApproval,
                user_id: Some("usr-worker".into()),
            }
        );
    }
}
