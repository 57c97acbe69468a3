use anyhow::bail;
use schemars::schema_for;
use sf_core::entities::{AuditEntry, DailyReport, Site, SiteDocument, SiteWorker};
use sf_core::responses::{ActionResult, CascadeDeleteResult};
use sf_core::steps::{Step, StepsOutcome};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `sfw schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name.trim().replace('_', "-").as_str() {
        "daily-report" | "report" => schema_for!(DailyReport),
        "site" => schema_for!(Site),
        "site-worker" => schema_for!(SiteWorker),
        "site-document" => schema_for!(SiteDocument),
        "audit-entry" => schema_for!(AuditEntry),
        "step" => schema_for!(Step),
        "steps-outcome" => schema_for!(StepsOutcome),
        "cascade-result" => schema_for!(CascadeDeleteResult),
        "action-result" => schema_for!(ActionResult<DailyReport>),
        other => bail!("unknown schema type '{other}'"),
    };
    output(&schema, flags.format)
}
