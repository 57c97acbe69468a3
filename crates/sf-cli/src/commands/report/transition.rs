use sf_db::actions;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output_action;

pub async fn advance(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let result = actions::advance(&ctx.service, id, &flags.role, flags.user.as_deref()).await;
    output_action(&result, flags.format)
}

pub async fn reject(
    id: &str,
    reason: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let result =
        actions::reject(&ctx.service, id, &flags.role, flags.user.as_deref(), reason).await;
    output_action(&result, flags.format)
}
