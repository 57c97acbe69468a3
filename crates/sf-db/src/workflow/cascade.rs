//! Cascade delete of a site and its dependents.
//!
//! The dependent collections come from configuration and are deleted in
//! order inside one libSQL transaction, followed by the site row itself. A
//! failure anywhere rolls the whole unit back, so a partial cascade is never
//! left behind.

use std::collections::BTreeMap;

use sf_core::audit_detail::CascadeDeletedDetail;
use sf_core::enums::{AuditAction, EntityType};
use sf_core::errors::WorkflowError;
use sf_core::identity::Actor;
use sf_core::responses::CascadeDeleteResult;

use crate::error::DatabaseError;
use crate::events::WorkflowEvent;
use crate::helpers::{to_json, validate_identifier};
use crate::repos::audit::AuditInput;
use crate::service::WorkflowService;

/// Delete every row of `collection` that belongs to `site_id`.
///
/// Probes up to `fetch_limit` rows first and skips the DELETE when there are
/// none. Returns the number of rows removed.
async fn delete_dependents(
    conn: &libsql::Connection,
    collection: &str,
    site_id: &str,
    fetch_limit: u32,
) -> Result<u64, DatabaseError> {
    validate_identifier(collection)?;

    let mut probe = conn
        .query(
            &format!("SELECT id FROM {collection} WHERE site_id = ?1 LIMIT {fetch_limit}"),
            [site_id],
        )
        .await?;
    if probe.next().await?.is_none() {
        return Ok(0);
    }
    drop(probe);

    Ok(conn
        .execute(
            &format!("DELETE FROM {collection} WHERE site_id = ?1"),
            [site_id],
        )
        .await?)
}

async fn rollback(tx: libsql::Transaction, site_id: &str) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!("rollback of cascade delete for {site_id} failed: {e}");
    }
}

impl WorkflowService {
    /// Delete a site together with its dependent rows.
    ///
    /// Collections with no rows are left out of `deleted_entities`.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::NotFound` if the site does not exist.
    /// - `WorkflowError::DependencyFailure` naming the collection whose delete
    ///   failed (or `sites` for the parent row). Nothing is deleted in that case.
    pub async fn cascade_delete(
        &self,
        site_id: &str,
        actor: &Actor,
    ) -> Result<CascadeDeleteResult, WorkflowError> {
        let site = self.get_site(site_id).await?;
        let settings = self.settings();
        let collections = &settings.cascade_collections;

        let tx = self
            .db()
            .conn()
            .transaction()
            .await
            .map_err(DatabaseError::from)?;

        let mut deleted_entities = BTreeMap::new();
        for (step, collection) in collections.iter().enumerate() {
            match delete_dependents(&tx, collection, site_id, settings.cascade_fetch_limit).await {
                Ok(0) => {}
                Ok(count) => {
                    tracing::debug!("cascade {site_id}: {count} rows from {collection}");
                    deleted_entities.insert(collection.clone(), count);
                }
                Err(e) => {
                    rollback(tx, site_id).await;
                    return Err(WorkflowError::DependencyFailure {
                        step,
                        collection: collection.clone(),
                        message: e.to_string(),
                        compensated: step,
                        uncompensated: 0,
                    });
                }
            }
        }

        if let Err(e) = tx.execute("DELETE FROM sites WHERE id = ?1", [site_id]).await {
            rollback(tx, site_id).await;
            return Err(WorkflowError::DependencyFailure {
                step: collections.len(),
                collection: "sites".into(),
                message: e.to_string(),
                compensated: collections.len(),
                uncompensated: 0,
            });
        }

        tx.commit().await.map_err(DatabaseError::from)?;
        tracing::info!("cascade deleted site {site_id}: {deleted_entities:?}");

        self.emit_audit(
            AuditInput::new(EntityType::Site, site_id, AuditAction::CascadeDeleted)
                .by(actor.user_id.as_deref())
                .changes(to_json(&CascadeDeletedDetail {
                    deleted_entities: deleted_entities.clone(),
                })?)
                .metadata(to_json(&site)?),
        )
        .await;
        self.publish(WorkflowEvent::SiteCascadeDeleted {
            site_id: site_id.to_string(),
            deleted_entities: deleted_entities.clone(),
        });

        Ok(CascadeDeleteResult {
            parent: site,
            deleted_entities,
        })
    }
}
