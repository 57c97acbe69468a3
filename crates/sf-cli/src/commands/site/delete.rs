use sf_db::actions;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output_action;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let result = actions::cascade_delete(&ctx.service, id, &flags.role, flags.user.as_deref()).await;
    output_action(&result, flags.format)
}
