//! Optimistic concurrency guard for daily reports.
//!
//! Every write to a report's content or status goes through
//! [`WorkflowService::write_if_version`]: a pre-check of the stored version,
//! then an `UPDATE … WHERE id = ? AND version = ?` that also bumps the
//! version. Losing either check yields `ConcurrentModification`.

use chrono::{DateTime, Utc};

use sf_core::audit_detail::{UpdatedDetail, VersionChange};
use sf_core::entities::DailyReport;
use sf_core::enums::{AuditAction, EntityType};
use sf_core::errors::WorkflowError;
use sf_core::identity::Actor;

use crate::events::WorkflowEvent;
use crate::helpers::to_json;
use crate::repos::audit::AuditInput;
use crate::service::WorkflowService;
use crate::updates::report::ReportUpdate;

fn conflict(report_id: &str, expected: i64, actual: Option<i64>) -> WorkflowError {
    WorkflowError::ConcurrentModification {
        entity_type: EntityType::DailyReport.to_string(),
        id: report_id.to_string(),
        expected,
        actual,
    }
}

impl WorkflowService {
    /// Apply `sets` to a report only if its stored version is still `expected`.
    ///
    /// Sets `version = expected + 1` and `updated_at = now` alongside the given
    /// columns. Returns the timestamp written. A version that cannot be
    /// incremented is a `Validation` error and nothing is written.
    pub(crate) async fn write_if_version(
        &self,
        report_id: &str,
        expected: i64,
        sets: Vec<(&'static str, libsql::Value)>,
    ) -> Result<DateTime<Utc>, WorkflowError> {
        let Some(next_version) = expected.checked_add(1) else {
            return Err(WorkflowError::Validation(format!(
                "report {report_id} is at the highest version and cannot be written"
            )));
        };
        let now = Utc::now();
        let mut clauses = Vec::with_capacity(sets.len() + 2);
        let mut params: Vec<libsql::Value> = Vec::with_capacity(sets.len() + 4);

        for (column, value) in sets {
            params.push(value);
            clauses.push(format!("{column} = ?{}", params.len()));
        }
        params.push(libsql::Value::Integer(next_version));
        clauses.push(format!("version = ?{}", params.len()));
        params.push(libsql::Value::Text(now.to_rfc3339()));
        clauses.push(format!("updated_at = ?{}", params.len()));

        params.push(libsql::Value::Text(report_id.to_string()));
        let id_idx = params.len();
        params.push(libsql::Value::Integer(expected));
        let version_idx = params.len();

        let sql = format!(
            "UPDATE daily_reports SET {} WHERE id = ?{id_idx} AND version = ?{version_idx}",
            clauses.join(", ")
        );
        let affected = self
            .db()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        if affected == 0 {
            return match self.current_version(report_id).await? {
                Some(actual) => Err(conflict(report_id, expected, Some(actual))),
                None => Err(WorkflowError::not_found(EntityType::DailyReport, report_id)),
            };
        }

        tracing::debug!("report {report_id} written at version {next_version}");
        Ok(now)
    }

    /// Apply a content patch if the caller's view of the report is current.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Validation` for an empty or invalid patch, or a
    ///   non-positive expected version. Storage is not touched.
    /// - `WorkflowError::NotFound` if the report does not exist.
    /// - `WorkflowError::ConcurrentModification` if the stored version differs
    ///   from `expected_version`, either at the pre-check or at write time.
    pub async fn update_if_version_matches(
        &self,
        report_id: &str,
        expected_version: i64,
        update: ReportUpdate,
        actor: &Actor,
    ) -> Result<DailyReport, WorkflowError> {
        update.validate()?;
        if expected_version < 1 {
            return Err(WorkflowError::Validation(format!(
                "expected version must be at least 1, got {expected_version}"
            )));
        }

        let current = self.get_report(report_id).await?;
        if current.version != expected_version {
            return Err(conflict(report_id, expected_version, Some(current.version)));
        }

        self.write_if_version(report_id, expected_version, update.assignments())
            .await?;
        let updated = self.get_report(report_id).await?;

        let detail = UpdatedDetail {
            before: update.snapshot_of(&current),
            after: to_json(&update)?,
            version: VersionChange {
                from: expected_version,
                to: updated.version,
            },
        };
        self.emit_audit(
            AuditInput::new(EntityType::DailyReport, report_id, AuditAction::Updated)
                .by(actor.user_id.as_deref())
                .changes(to_json(&detail)?),
        )
        .await;
        self.publish(WorkflowEvent::ReportUpdated {
            report_id: report_id.to_string(),
            version: updated.version,
        });

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{seed_report, test_service, worker};
    use crate::updates::report::ReportUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn matching_version_applies_patch_and_bumps_version() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;

        let patch = ReportUpdateBuilder::new()
            .content("Rebar inspection passed")
            .headcount(Some(9))
            .build();
        let updated = svc
            .update_if_version_matches(&report.id, 1, patch, &worker())
            .await
            .unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.content, "Rebar inspection passed");
        assert_eq!(updated.headcount, Some(9));
        assert_eq!(updated.weather, report.weather);
        assert_eq!(updated.status, report.status);
        assert!(updated.updated_at >= report.updated_at);
        assert_eq!(svc.get_report(&report.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn stale_version_is_conflict_and_leaves_row_alone() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;

        let err = svc
            .update_if_version_matches(
                &report.id,
                7,
                ReportUpdateBuilder::new().content("B").build(),
                &worker(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::ConcurrentModification { expected: 7, actual: Some(1), .. }
        ));
        assert_eq!(svc.get_report(&report.id).await.unwrap(), report);
    }

    #[tokio::test]
    async fn write_time_check_catches_a_race() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;

        // Someone else bumps the version between our read and our write.
        svc.db()
            .execute(
                "UPDATE daily_reports SET version = 2 WHERE id = ?1",
                [report.id.as_str()],
            )
            .await
            .unwrap();
        let err = svc
            .write_if_version(
                &report.id,
                1,
                vec![("content", libsql::Value::Text("late".into()))],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::ConcurrentModification { expected: 1, actual: Some(2), .. }
        ));
        assert_eq!(svc.get_report(&report.id).await.unwrap().content, report.content);
    }

    #[tokio::test]
    async fn missing_report_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .update_if_version_matches(
                "rpt-missing",
                1,
                ReportUpdateBuilder::new().content("x").build(),
                &worker(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[tokio::test]
    async fn empty_patch_is_validation_error() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        let err = svc
            .update_if_version_matches(&report.id, 1, ReportUpdate::default(), &worker())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[tokio::test]
    async fn update_is_audited_with_before_and_after() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        svc.update_if_version_matches(
            &report.id,
            1,
            ReportUpdateBuilder::new().weather(None).build(),
            &worker(),
        )
        .await
        .unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(report.id.clone()),
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        let detail: UpdatedDetail =
            serde_json::from_value(entries[0].changes.clone().unwrap()).unwrap();
        assert_eq!(detail.before, serde_json::json!({"weather": "clear"}));
        assert_eq!(detail.after, serde_json::json!({"weather": null}));
        assert_eq!(detail.version, VersionChange { from: 1, to: 2 });
    }

    #[tokio::test]
    async fn conflict_publishes_nothing() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        let mut events = svc.subscribe();

        svc.update_if_version_matches(
            &report.id,
            2,
            ReportUpdateBuilder::new().content("late").build(),
            &worker(),
        )
        .await
        .unwrap_err();
        svc.update_if_version_matches(
            &report.id,
            1,
            ReportUpdateBuilder::new().content("first").build(),
            &worker(),
        )
        .await
        .unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            WorkflowEvent::ReportUpdated {
                report_id: report.id.clone(),
                version: 2,
            }
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn exhausted_version_is_refused_without_writing() {
        let svc = test_service().await;
        let (_, report) = seed_report(&svc).await;
        svc.db()
            .execute(
                "UPDATE daily_reports SET version = ?1 WHERE id = ?2",
                libsql::params![i64::MAX, report.id.as_str()],
            )
            .await
            .unwrap();

        let err = svc
            .update_if_version_matches(
                &report.id,
                i64::MAX,
                ReportUpdateBuilder::new().content("late edit").build(),
                &worker(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");

        let stored = svc.get_report(&report.id).await.unwrap();
        assert_eq!(stored.version, i64::MAX);
        assert_eq!(stored.content, report.content);

        let err = svc.advance(&report.id, &worker()).await.unwrap_err();
        assert_eq!(err.code(), "validation_error");
        assert_eq!(
            svc.get_report(&report.id).await.unwrap().status,
            report.status
        );
    }
}
