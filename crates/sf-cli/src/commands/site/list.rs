use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
    let sites = ctx.service.list_sites(limit).await?;
    output(&sites, flags.format)
}
