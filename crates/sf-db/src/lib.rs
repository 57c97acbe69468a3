//! # sf-db
//!
//! libSQL persistence and the daily-report workflow engine for siteflow.
//!
//! Holds relational state (sites, daily reports, worker assignments, site
//! documents, audit log) and the operations that move it: role-gated status
//! transitions, version-checked updates, atomic cascade deletes, and
//! multi-step batches with compensation.
//!
//! Uses the `libsql` crate (v0.9.29) in local mode.

pub mod actions;
pub mod error;
pub mod events;
pub mod helpers;
pub mod journal;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;
pub mod workflow;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;

/// Central database handle for siteflow state.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct SiteDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SiteDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let site_db = Self { db, conn };
        site_db.run_migrations().await?;
        Ok(site_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Execute a statement and return the number of rows it changed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the statement fails.
    pub async fn execute(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<u64, DatabaseError> {
        Ok(self.conn.execute(sql, params).await?)
    }

    /// Run a query and return its rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the query fails.
    pub async fn query(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<libsql::Rows, DatabaseError> {
        Ok(self.conn.query(sql, params).await?)
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"rpt-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> SiteDb {
        SiteDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "sites",
            "daily_reports",
            "site_workers",
            "site_documents",
            "audit_log",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("rpt").await.unwrap();
        assert!(id.starts_with("rpt-"), "ID should start with 'rpt-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in sf_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_enforced() {
        let db = test_db().await;
        let result = db
            .execute(
                "INSERT INTO site_workers (id, site_id, worker_id) VALUES ('swk-1', 'sit-missing', 'usr-1')",
                (),
            )
            .await;
        assert!(result.is_err(), "orphan assignment should be rejected");
    }

    #[tokio::test]
    async fn rejected_status_requires_reason() {
        let db = test_db().await;
        db.execute("INSERT INTO sites (id, name) VALUES ('sit-1', 'A')", ())
            .await
            .unwrap();
        let result = db
            .execute(
                "INSERT INTO daily_reports (id, site_id, created_by, work_date, content, status)
                 VALUES ('rpt-1', 'sit-1', 'usr-1', '2026-03-02', 'x', 'rejected')",
                (),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn audit_log_is_append_only() {
        let db = test_db().await;
        db.execute(
            "INSERT INTO audit_log (id, entity_type, entity_id, action) VALUES ('aud-1', 'site', 'sit-1', 'created')",
            (),
        )
        .await
        .unwrap();
        assert!(db.execute("UPDATE audit_log SET action = 'deleted'", ()).await.is_err());
        assert!(db.execute("DELETE FROM audit_log", ()).await.is_err());
    }

    #[tokio::test]
    async fn execute_reports_rows_affected() {
        let db = test_db().await;
        db.execute("INSERT INTO sites (id, name) VALUES ('sit-1', 'A')", ())
            .await
            .unwrap();
        let n = db
            .execute("UPDATE sites SET name = 'B' WHERE id = ?1", ["sit-1"])
            .await
            .unwrap();
        assert_eq!(n, 1);
        let n = db
            .execute("UPDATE sites SET name = 'B' WHERE id = ?1", ["sit-missing"])
            .await
            .unwrap();
        assert_eq!(n, 0);
    }
}
