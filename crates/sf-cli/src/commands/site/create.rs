use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    address: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = AppContext::actor(flags)?;
    let site = ctx.service.create_site(name, address, &actor).await?;
    output(&site, flags.format)
}
