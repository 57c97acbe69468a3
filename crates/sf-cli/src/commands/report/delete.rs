use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse<'a> {
    deleted: &'a str,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = AppContext::actor(flags)?;
    ctx.service.delete_report(id, &actor).await?;
    output(&DeleteResponse { deleted: id }, flags.format)
}
