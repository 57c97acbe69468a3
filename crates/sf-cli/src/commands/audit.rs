use anyhow::bail;
use sf_core::enums::{AuditAction, EntityType};
use sf_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sfw audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entity_type = args
        .entity_type
        .as_deref()
        .map(|raw| parse_enum::<EntityType>(raw, "entity type"))
        .transpose()?;
    let action = args
        .action
        .as_deref()
        .map(|raw| parse_enum::<AuditAction>(raw, "action"))
        .transpose()?;
    let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);

    if args.journal {
        let Some(entity_type) = entity_type else {
            bail!("--journal needs --entity-type");
        };
        if !ctx.service.journal().is_enabled() {
            bail!("audit journal is disabled (set audit.journal_dir)");
        }
        let mut entries = ctx.service.journal().read(entity_type)?;
        entries.retain(|e| {
            args.entity_id.as_ref().is_none_or(|id| &e.entity_id == id)
                && action.is_none_or(|a| e.action == a)
                && args
                    .by
                    .as_ref()
                    .is_none_or(|by| e.user_id.as_ref() == Some(by))
        });
        entries.reverse();
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        return output(&entries, flags.format);
    }

    let filter = AuditFilter {
        entity_type,
        entity_id: args.entity_id.clone(),
        action,
        user_id: args.by.clone(),
        limit: Some(limit),
    };
    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
