use serde::Serialize;
use sf_core::entities::{Site, SiteDocument, SiteWorker};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SiteDetail {
    site: Site,
    workers: Vec<SiteWorker>,
    documents: Vec<SiteDocument>,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let site = ctx.service.get_site(id).await?;
    let workers = ctx.service.list_site_workers(id).await?;
    let documents = ctx.service.list_site_documents(id).await?;
    output(
        &SiteDetail {
            site,
            workers,
            documents,
        },
        flags.format,
    )
}
