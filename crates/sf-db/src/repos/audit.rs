//! Audit log repository.
//!
//! Append-only audit entries recording every mutation. Writes from the
//! workflow go through [`WorkflowService::emit_audit`], which never fails the
//! caller: the mutation has already landed by the time it is audited.

use chrono::Utc;

use sf_core::entities::AuditEntry;
use sf_core::enums::{AuditAction, EntityType};
use sf_core::errors::WorkflowError;
use sf_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, next_row, parse_datetime, parse_enum, parse_optional_json};
use crate::service::WorkflowService;

const SELECT_COLS: &str =
    "id, entity_type, entity_id, action, user_id, changes, metadata, created_at";

/// An audit entry before it has an id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditInput {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: AuditAction,
    pub user_id: Option<String>,
    pub changes: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}

impl AuditInput {
    pub fn new(entity_type: EntityType, entity_id: impl Into<String>, action: AuditAction) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.into(),
            action,
            user_id: None,
            changes: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn by(mut self, user_id: Option<&str>) -> Self {
        self.user_id = user_id.map(String::from);
        self
    }

    #[must_use]
    pub fn changes(mut self, changes: serde_json::Value) -> Self {
        self.changes = Some(changes);
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub user_id: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        user_id: get_opt_string(row, 4)?,
        changes: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        metadata: parse_optional_json(get_opt_string(row, 6)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl WorkflowService {
    /// Write one audit entry and mirror it to the journal.
    ///
    /// Journal failures are logged; the database row is the record.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` for an empty entity id, or
    /// `WorkflowError::Storage` if the INSERT fails.
    pub async fn record_audit(&self, input: AuditInput) -> Result<AuditEntry, WorkflowError> {
        if input.entity_id.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "audit entity id is required".into(),
            ));
        }

        let entry = AuditEntry {
            id: self.db().generate_id(PREFIX_AUDIT).await?,
            entity_type: input.entity_type,
            entity_id: input.entity_id,
            action: input.action,
            user_id: input.user_id,
            changes: input.changes,
            metadata: input.metadata,
            created_at: Utc::now(),
        };

        self.db()
            .execute(
                &format!("INSERT INTO audit_log ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                libsql::params![
                    entry.id.as_str(),
                    entry.entity_type.as_str(),
                    entry.entity_id.as_str(),
                    entry.action.as_str(),
                    entry.user_id.as_deref(),
                    entry.changes.as_ref().map(ToString::to_string).as_deref(),
                    entry.metadata.as_ref().map(ToString::to_string).as_deref(),
                    entry.created_at.to_rfc3339()
                ],
            )
            .await?;

        if let Err(e) = self.journal().append(&entry) {
            tracing::warn!("audit journal append failed for {}: {e}", entry.id);
        }

        Ok(entry)
    }

    /// Record an audit entry without letting a failure reach the caller.
    pub(crate) async fn emit_audit(&self, input: AuditInput) {
        let target = format!("{} {} {}", input.entity_type, input.entity_id, input.action);
        if let Err(e) = self.record_audit(input).await {
            tracing::warn!("audit write failed for {target}: {e}");
        }
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, WorkflowError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref uid) = filter.user_id {
            params.push(libsql::Value::Text(uid.clone()));
            conditions.push(format!("user_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM audit_log {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = next_row(&mut rows).await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{test_service, test_service_with_journal};

    #[tokio::test]
    async fn record_and_query_roundtrip() {
        let svc = test_service().await;
        let entry = svc
            .record_audit(
                AuditInput::new(EntityType::DailyReport, "rpt-1", AuditAction::StatusChanged)
                    .by(Some("usr-1"))
                    .changes(serde_json::json!({"from": "draft", "to": "pending_approval"})),
            )
            .await
            .unwrap();
        assert!(entry.id.starts_with("aud-"));

        let found = svc
            .query_audit(&AuditFilter {
                entity_id: Some("rpt-1".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found, vec![entry]);
    }

    #[tokio::test]
    async fn query_filters_by_action_and_user() {
        let svc = test_service().await;
        svc.record_audit(AuditInput::new(EntityType::Site, "sit-1", AuditAction::Created).by(Some("usr-1")))
            .await
            .unwrap();
        svc.record_audit(AuditInput::new(EntityType::Site, "sit-1", AuditAction::CascadeDeleted).by(Some("usr-2")))
            .await
            .unwrap();

        let created = svc
            .query_audit(&AuditFilter {
                action: Some(AuditAction::Created),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.len(), 1);

        let by_user2 = svc
            .query_audit(&AuditFilter {
                user_id: Some("usr-2".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_user2.len(), 1);
        assert_eq!(by_user2[0].action, AuditAction::CascadeDeleted);
    }

    #[tokio::test]
    async fn empty_entity_id_is_validation_error() {
        let svc = test_service().await;
        let err = svc
            .record_audit(AuditInput::new(EntityType::Site, " ", AuditAction::Created))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[tokio::test]
    async fn audit_failure_surfaces_from_record_but_not_emit() {
        let svc = test_service().await;
        svc.db().execute("DROP TABLE audit_log", ()).await.unwrap();

        let err = svc
            .record_audit(AuditInput::new(EntityType::Site, "sit-1", AuditAction::Created))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "storage_error");

        svc.emit_audit(AuditInput::new(EntityType::Site, "sit-1", AuditAction::Created))
            .await;
    }

    #[tokio::test]
    async fn entries_are_mirrored_to_journal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let svc = test_service_with_journal(tmp.path().to_path_buf()).await;
        let entry = svc
            .record_audit(AuditInput::new(EntityType::SiteWorker, "swk-1", AuditAction::Created))
            .await
            .unwrap();
        let journaled = svc.journal().read(EntityType::SiteWorker).unwrap();
        assert_eq!(journaled, vec![entry]);
    }
}
