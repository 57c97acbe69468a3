//! Site repository: sites, worker assignments, and site documents.

use chrono::Utc;

use sf_core::entities::{Site, SiteDocument, SiteWorker};
use sf_core::enums::{AuditAction, DocumentKind, EntityType};
use sf_core::errors::WorkflowError;
use sf_core::identity::Actor;
use sf_core::ids::{PREFIX_DOCUMENT, PREFIX_SITE, PREFIX_WORKER_ASSIGNMENT};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, next_row, parse_datetime, parse_enum, to_json};
use crate::repos::audit::AuditInput;
use crate::service::WorkflowService;

const SITE_COLS: &str = "id, name, address, created_at, updated_at";
const WORKER_COLS: &str = "id, site_id, worker_id, role, assigned_at";
const DOCUMENT_COLS: &str = "id, site_id, title, kind, amount, created_at";

pub(crate) fn row_to_site(row: &libsql::Row) -> Result<Site, DatabaseError> {
    Ok(Site {
        id: row.get(0)?,
        name: row.get(1)?,
        address: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn row_to_worker(row: &libsql::Row) -> Result<SiteWorker, DatabaseError> {
    Ok(SiteWorker {
        id: row.get(0)?,
        site_id: row.get(1)?,
        worker_id: row.get(2)?,
        role: get_opt_string(row, 3)?,
        assigned_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn row_to_document(row: &libsql::Row) -> Result<SiteDocument, DatabaseError> {
    Ok(SiteDocument {
        id: row.get(0)?,
        site_id: row.get(1)?,
        title: row.get(2)?,
        kind: parse_enum(&row.get::<String>(3)?)?,
        amount: row.get::<Option<i64>>(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

fn required(value: &str, field: &str) -> Result<(), WorkflowError> {
    if value.trim().is_empty() {
        return Err(WorkflowError::Validation(format!("{field} is required")));
    }
    Ok(())
}

impl WorkflowService {
    /// Create a site.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` for a blank name.
    pub async fn create_site(
        &self,
        name: &str,
        address: Option<&str>,
        actor: &Actor,
    ) -> Result<Site, WorkflowError> {
        required(name, "site name")?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SITE).await?;

        self.db()
            .execute(
                &format!("INSERT INTO sites ({SITE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    id.as_str(),
                    name.trim(),
                    address,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let site = Site {
            id: id.clone(),
            name: name.trim().to_string(),
            address: address.map(String::from),
            created_at: now,
            updated_at: now,
        };

        self.emit_audit(
            AuditInput::new(EntityType::Site, id, AuditAction::Created)
                .by(actor.user_id.as_deref())
                .changes(to_json(&site)?),
        )
        .await;

        Ok(site)
    }

    pub(crate) async fn fetch_site(&self, id: &str) -> Result<Option<Site>, DatabaseError> {
        let mut rows = self
            .db()
            .query(&format!("SELECT {SITE_COLS} FROM sites WHERE id = ?1"), [id])
            .await?;
        next_row(&mut rows).await?.map(|row| row_to_site(&row)).transpose()
    }

    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` if no site has this id.
    pub async fn get_site(&self, id: &str) -> Result<Site, WorkflowError> {
        self.fetch_site(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(EntityType::Site, id))
    }

    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the query fails.
    pub async fn list_sites(&self, limit: u32) -> Result<Vec<Site>, WorkflowError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SITE_COLS} FROM sites ORDER BY created_at DESC, rowid DESC LIMIT {limit}"),
                (),
            )
            .await?;
        let mut sites = Vec::new();
        while let Some(row) = next_row(&mut rows).await? {
            sites.push(row_to_site(&row)?);
        }
        Ok(sites)
    }

    /// Assign a worker to a site.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` for an unknown site, or
    /// `WorkflowError::Validation` for a blank worker id or a duplicate
    /// assignment.
    pub async fn assign_worker(
        &self,
        site_id: &str,
        worker_id: &str,
        role: Option<&str>,
        actor: &Actor,
    ) -> Result<SiteWorker, WorkflowError> {
        required(worker_id, "worker id")?;
        self.get_site(site_id).await?;

        let mut existing = self
            .db()
            .query(
                "SELECT id FROM site_workers WHERE site_id = ?1 AND worker_id = ?2",
                libsql::params![site_id, worker_id],
            )
            .await?;
        if next_row(&mut existing).await?.is_some() {
            return Err(WorkflowError::Validation(format!(
                "worker {worker_id} is already assigned to site {site_id}"
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_WORKER_ASSIGNMENT).await?;
        self.db()
            .execute(
                &format!("INSERT INTO site_workers ({WORKER_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![id.as_str(), site_id, worker_id, role, now.to_rfc3339()],
            )
            .await?;

        let worker = SiteWorker {
            id: id.clone(),
            site_id: site_id.to_string(),
            worker_id: worker_id.to_string(),
            role: role.map(String::from),
            assigned_at: now,
        };

        self.emit_audit(
            AuditInput::new(EntityType::SiteWorker, id, AuditAction::Created)
                .by(actor.user_id.as_deref())
                .changes(to_json(&worker)?),
        )
        .await;

        Ok(worker)
    }

    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the query fails.
    pub async fn list_site_workers(&self, site_id: &str) -> Result<Vec<SiteWorker>, WorkflowError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {WORKER_COLS} FROM site_workers WHERE site_id = ?1 ORDER BY assigned_at, rowid"),
                [site_id],
            )
            .await?;
        let mut workers = Vec::new();
        while let Some(row) = next_row(&mut rows).await? {
            workers.push(row_to_worker(&row)?);
        }
        Ok(workers)
    }

    /// File a document or invoice against a site.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` for an unknown site, or
    /// `WorkflowError::Validation` for a blank title, a negative amount, or
    /// an invoice without an amount.
    pub async fn add_site_document(
        &self,
        site_id: &str,
        title: &str,
        kind: DocumentKind,
        amount: Option<i64>,
        actor: &Actor,
    ) -> Result<SiteDocument, WorkflowError> {
        required(title, "document title")?;
        if amount.is_some_and(|a| a < 0) {
            return Err(WorkflowError::Validation("amount must not be negative".into()));
        }
        if kind == DocumentKind::Invoice && amount.is_none() {
            return Err(WorkflowError::Validation("invoices need an amount".into()));
        }
        self.get_site(site_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DOCUMENT).await?;
        self.db()
            .execute(
                &format!("INSERT INTO site_documents ({DOCUMENT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    site_id,
                    title.trim(),
                    kind.as_str(),
                    amount,
                    now.to_rfc3339()
                ],
            )
            .await?;

        let document = SiteDocument {
            id: id.clone(),
            site_id: site_id.to_string(),
            title: title.trim().to_string(),
            kind,
            amount,
            created_at: now,
        };

        self.emit_audit(
            AuditInput::new(EntityType::SiteDocument, id, AuditAction::Created)
                .by(actor.user_id.as_deref())
                .changes(to_json(&document)?),
        )
        .await;

        Ok(document)
    }

    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the query fails.
    pub async fn list_site_documents(
        &self,
        site_id: &str,
    ) -> Result<Vec<SiteDocument>, WorkflowError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {DOCUMENT_COLS} FROM site_documents WHERE site_id = ?1 ORDER BY created_at, rowid"),
                [site_id],
            )
            .await?;
        let mut documents = Vec::new();
        while let Some(row) = next_row(&mut rows).await? {
            documents.push(row_to_document(&row)?);
        }
        Ok(documents)
    }
}
