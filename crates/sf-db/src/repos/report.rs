//! Daily report repository: creation, reads, listing, and draft deletion.

use chrono::{NaiveDate, Utc};

use sf_core::entities::DailyReport;
use sf_core::enums::{AuditAction, EntityType, ReportStatus};
use sf_core::errors::WorkflowError;
use sf_core::identity::Actor;
use sf_core::ids::PREFIX_REPORT;

use crate::error::DatabaseError;
use crate::events::WorkflowEvent;
use crate::helpers::{
    get_opt_string, next_row, parse_date, parse_datetime, parse_enum, parse_optional_datetime,
    to_json,
};
use crate::repos::audit::AuditInput;
use crate::service::WorkflowService;

pub(crate) const SELECT_COLS: &str = "id, site_id, created_by, work_date, content, weather, \
     headcount, status, version, submitted_at, manager_approved_at, approved_at, rejected_at, \
     rejection_reason, created_at, updated_at";

pub(crate) fn row_to_report(row: &libsql::Row) -> Result<DailyReport, DatabaseError> {
    Ok(DailyReport {
        id: row.get(0)?,
        site_id: row.get(1)?,
        created_by: row.get(2)?,
        work_date: parse_date(&row.get::<String>(3)?)?,
        content: row.get(4)?,
        weather: get_opt_string(row, 5)?,
        headcount: row.get::<Option<i64>>(6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        version: row.get(8)?,
        submitted_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        manager_approved_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        approved_at: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
        rejected_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        rejection_reason: get_opt_string(row, 13)?,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

/// Input for a new daily report. The author comes from the acting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub site_id: String,
    pub work_date: NaiveDate,
    pub content: String,
    pub weather: Option<String>,
    pub headcount: Option<i64>,
}

/// Filter criteria for report listings.
#[derive(Debug, Default)]
pub struct ReportFilter {
    pub site_id: Option<String>,
    pub status: Option<ReportStatus>,
    pub created_by: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl WorkflowService {
    /// Create a report in `draft` at version 1.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if the actor has no user id, the
    /// content is blank, or the headcount is negative; `WorkflowError::NotFound`
    /// if the site does not exist.
    pub async fn create_report(
        &self,
        new: &NewReport,
        actor: &Actor,
    ) -> Result<DailyReport, WorkflowError> {
        let Some(created_by) = actor.user_id.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Err(WorkflowError::Validation(
                "report author user id is required".into(),
            ));
        };
        if new.content.trim().is_empty() {
            return Err(WorkflowError::Validation("report content is required".into()));
        }
        if new.headcount.is_some_and(|h| h < 0) {
            return Err(WorkflowError::Validation(
                "headcount must not be negative".into(),
            ));
        }
        self.get_site(&new.site_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_REPORT).await?;
        self.db()
            .execute(
                "INSERT INTO daily_reports (id, site_id, created_by, work_date, content, weather, \
                 headcount, status, version, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10)",
                libsql::params![
                    id.as_str(),
                    new.site_id.as_str(),
                    created_by,
                    new.work_date.to_string(),
                    new.content.as_str(),
                    new.weather.as_deref(),
                    new.headcount,
                    ReportStatus::Draft.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let report = DailyReport {
            id: id.clone(),
            site_id: new.site_id.clone(),
            created_by: created_by.to_string(),
            work_date: new.work_date,
            content: new.content.clone(),
            weather: new.weather.clone(),
            headcount: new.headcount,
            status: ReportStatus::Draft,
            version: 1,
            submitted_at: None,
            manager_approved_at: None,
            approved_at: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };

        self.emit_audit(
            AuditInput::new(EntityType::DailyReport, id.clone(), AuditAction::Created)
                .by(Some(created_by))
                .changes(to_json(&report)?),
        )
        .await;
        self.publish(WorkflowEvent::ReportCreated {
            report_id: id,
            site_id: new.site_id.clone(),
        });

        Ok(report)
    }

    pub(crate) async fn fetch_report(&self, id: &str) -> Result<Option<DailyReport>, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SELECT_COLS} FROM daily_reports WHERE id = ?1"),
                [id],
            )
            .await?;
        next_row(&mut rows)
            .await?
            .map(|row| row_to_report(&row))
            .transpose()
    }

    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` if no report has this id.
    pub async fn get_report(&self, id: &str) -> Result<DailyReport, WorkflowError> {
        self.fetch_report(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(EntityType::DailyReport, id))
    }

    /// List reports, newest work date first.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the query fails.
    pub async fn list_reports(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<DailyReport>, WorkflowError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref site_id) = filter.site_id {
            params.push(libsql::Value::Text(site_id.clone()));
            conditions.push(format!("site_id = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref created_by) = filter.created_by {
            params.push(libsql::Value::Text(created_by.clone()));
            conditions.push(format!("created_by = ?{}", params.len()));
        }
        if let Some(from) = filter.from {
            params.push(libsql::Value::Text(from.to_string()));
            conditions.push(format!("work_date >= ?{}", params.len()));
        }
        if let Some(to) = filter.to {
            params.push(libsql::Value::Text(to.to_string()));
            conditions.push(format!("work_date <= ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(self.settings().default_limit);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM daily_reports {where_clause}
             ORDER BY work_date DESC, created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut reports = Vec::new();
        while let Some(row) = next_row(&mut rows).await? {
            reports.push(row_to_report(&row)?);
        }
        Ok(reports)
    }

    /// Current stored version, or `None` if the report is gone.
    pub(crate) async fn current_version(&self, id: &str) -> Result<Option<i64>, DatabaseError> {
        let mut rows = self
            .db()
            .query("SELECT version FROM daily_reports WHERE id = ?1", [id])
            .await?;
        match next_row(&mut rows).await? {
            Some(row) => Ok(Some(row.get::<i64>(0)?)),
            None => Ok(None),
        }
    }

    /// Delete a report that never left `draft`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` for an unknown report,
    /// `WorkflowError::InvalidTransition` if it is past `draft`, or
    /// `WorkflowError::ConcurrentModification` if it changed underneath.
    pub async fn delete_report(&self, id: &str, actor: &Actor) -> Result<(), WorkflowError> {
        let current = self.get_report(id).await?;
        if current.status != ReportStatus::Draft {
            return Err(WorkflowError::InvalidTransition {
                entity_type: EntityType::DailyReport.to_string(),
                id: id.to_string(),
                role: actor.role.to_string(),
                from: current.status.to_string(),
                action: "delete".into(),
            });
        }

        let deleted = self
            .db()
            .execute(
                "DELETE FROM daily_reports WHERE id = ?1 AND status = 'draft' AND version = ?2",
                libsql::params![id, current.version],
            )
            .await?;
        if deleted == 0 {
            return Err(WorkflowError::ConcurrentModification {
                entity_type: EntityType::DailyReport.to_string(),
                id: id.to_string(),
                expected: current.version,
                actual: self.current_version(id).await?,
            });
        }

        self.emit_audit(
            AuditInput::new(EntityType::DailyReport, id, AuditAction::Deleted)
                .by(actor.user_id.as_deref())
                .changes(to_json(&current)?),
        )
        .await;
        self.publish(WorkflowEvent::ReportDeleted {
            report_id: id.to_string(),
        });

        Ok(())
    }
}
