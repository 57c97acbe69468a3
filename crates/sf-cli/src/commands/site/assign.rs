use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    site_id: &str,
    worker_id: &str,
    job: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = AppContext::actor(flags)?;
    let assignment = ctx
        .service
        .assign_worker(site_id, worker_id, job, &actor)
        .await?;
    output(&assignment, flags.format)
}
