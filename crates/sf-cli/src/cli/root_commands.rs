use clap::{Args, Subcommand};

use super::subcommands::{ReportCommands, SiteCommands};

/// All top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default `.siteflow/config.toml`.
    Init(InitArgs),
    /// Site management and cascade delete.
    Site {
        #[command(subcommand)]
        action: SiteCommands,
    },
    /// Daily report lifecycle.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Run a JSON batch of steps with rollback.
    Steps(StepsArgs),
    /// Query the audit log.
    Audit(AuditArgs),
    /// Print the JSON Schema of a workflow type.
    Schema(SchemaArgs),
}

/// Arguments for `sfw init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `sfw steps`.
#[derive(Clone, Debug, Args)]
pub struct StepsArgs {
    /// Path to a JSON array of steps (`-` reads stdin)
    pub file: String,
}

/// Arguments for `sfw audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Filter by entity type (site, daily_report, site_worker, site_document, step_batch)
    #[arg(long)]
    pub entity_type: Option<String>,

    /// Filter by entity id
    #[arg(long)]
    pub entity_id: Option<String>,

    /// Filter by action (created, updated, status_changed, deleted, ...)
    #[arg(long)]
    pub action: Option<String>,

    /// Filter by acting user
    #[arg(long)]
    pub by: Option<String>,

    /// Read the JSONL journal for an entity type instead of the database
    #[arg(long)]
    pub journal: bool,
}

/// Arguments for `sfw schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name: daily-report, site, audit-entry, step, action-result, cascade-result
    pub type_name: String,
}
