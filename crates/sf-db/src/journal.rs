//! JSONL audit journal.
//!
//! Mirrors every recorded audit entry into per-entity-type
//! `{journal_dir}/{entity_type}.jsonl` files. Uses
//! `serde_jsonlines::append_json_lines` for per-line appends.

use std::path::{Path, PathBuf};

use sf_core::entities::AuditEntry;
use sf_core::enums::EntityType;

use crate::error::DatabaseError;

/// Appends audit entries to JSONL files next to the database.
pub struct AuditJournal {
    journal_dir: PathBuf,
    enabled: bool,
}

impl AuditJournal {
    /// Create a journal writing into `journal_dir`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(journal_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&journal_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            journal_dir,
            enabled: true,
        })
    }

    /// Create a disabled journal (the default when no directory is configured).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            journal_dir: PathBuf::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one entry to `{journal_dir}/{entity_type}.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, entry: &AuditEntry) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.path_for(entry.entity_type);
        serde_jsonlines::append_json_lines(&path, [entry])
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(())
    }

    /// Read back every journaled entry for one entity type, oldest first.
    ///
    /// A missing file reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file exists but cannot be parsed.
    pub fn read(&self, entity_type: EntityType) -> Result<Vec<AuditEntry>, DatabaseError> {
        let path = self.path_for(entity_type);
        if !self.enabled || !path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines::<AuditEntry, _>(&path)
            .map_err(|e| DatabaseError::Other(e.into()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Other(e.into()))
    }

    /// The directory where journal files are stored.
    #[must_use]
    pub fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }

    fn path_for(&self, entity_type: EntityType) -> PathBuf {
        self.journal_dir.join(format!("{}.jsonl", entity_type.as_str()))
    }
}
