//! Service layer orchestrating workflow mutations with audit and events.
//!
//! `WorkflowService` wraps `SiteDb` (raw database access), `AuditJournal`
//! (JSONL mirror of the audit log), and a broadcast sender for
//! [`WorkflowEvent`]s. All repo and workflow methods are implemented as
//! `impl WorkflowService`.

use std::path::{Path, PathBuf};

use sf_config::SiteflowConfig;
use sf_core::errors::Locale;
use sf_core::transitions::RejectPolicy;
use tokio::sync::broadcast;

use crate::SiteDb;
use crate::error::DatabaseError;
use crate::events::WorkflowEvent;
use crate::journal::AuditJournal;

/// Tunables the workflow reads on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub reject_policy: RejectPolicy,
    /// Dependent tables deleted, in order, before their parent site.
    pub cascade_collections: Vec<String>,
    pub cascade_fetch_limit: u32,
    pub event_capacity: usize,
    pub default_limit: u32,
    pub locale: Locale,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self::from(&SiteflowConfig::default())
    }
}

impl From<&SiteflowConfig> for WorkflowSettings {
    fn from(config: &SiteflowConfig) -> Self {
        Self {
            reject_policy: config.workflow.reject_policy,
            cascade_collections: config.workflow.cascade_collections.clone(),
            cascade_fetch_limit: config.workflow.cascade_fetch_limit,
            event_capacity: config.audit.event_capacity,
            default_limit: config.general.default_limit,
            locale: config.general.locale,
        }
    }
}

/// Orchestrates workflow mutations with audit log and events.
///
/// Every mutation method follows this protocol:
/// 1. Validate input and load current state
/// 2. Execute SQL (version-checked or inside a transaction)
/// 3. Record an audit entry (best-effort, mirrored to the journal)
/// 4. Publish a `WorkflowEvent`
pub struct WorkflowService {
    db: SiteDb,
    journal: AuditJournal,
    events: broadcast::Sender<WorkflowEvent>,
    settings: WorkflowSettings,
}

impl WorkflowService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `journal_dir` - Directory for JSONL audit files. Pass `None` to disable.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the journal
    /// directory cannot be created.
    pub async fn new_local(
        db_path: &str,
        journal_dir: Option<PathBuf>,
        settings: WorkflowSettings,
    ) -> Result<Self, DatabaseError> {
        let db = SiteDb::open_local(db_path).await?;
        let journal = match journal_dir {
            Some(dir) => AuditJournal::new(dir)?,
            None => AuditJournal::disabled(),
        };
        Ok(Self::from_db(db, journal, settings))
    }

    /// Open the database and journal described by a loaded config.
    ///
    /// Creates the database's parent directory when it is a file path.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory, database, or journal cannot
    /// be created.
    pub async fn from_config(config: &SiteflowConfig) -> Result<Self, DatabaseError> {
        if !config.database.is_in_memory() {
            if let Some(parent) = Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| DatabaseError::Other(e.into()))?;
                }
            }
        }
        let journal_dir = config
            .audit
            .has_journal()
            .then(|| PathBuf::from(&config.audit.journal_dir));
        tracing::debug!(
            "opening workflow service at {} (journal: {:?})",
            config.database.path,
            journal_dir
        );
        Self::new_local(&config.database.path, journal_dir, WorkflowSettings::from(config)).await
    }

    /// Create from an existing `SiteDb` (for testing).
    #[must_use]
    pub fn from_db(db: SiteDb, journal: AuditJournal, settings: WorkflowSettings) -> Self {
        let (events, _) = broadcast::channel(settings.event_capacity.max(1));
        Self {
            db,
            journal,
            events,
            settings,
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SiteDb {
        &self.db
    }

    #[must_use]
    pub const fn journal(&self) -> &AuditJournal {
        &self.journal
    }

    #[must_use]
    pub const fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Subscribe to events published after each successful mutation.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub(crate) fn publish(&self, event: WorkflowEvent) {
        let kind = event.kind();
        if self.events.send(event).is_err() {
            tracing::trace!("no subscribers for {kind} event");
        }
    }
}
