#[path = "site/assign.rs"]
mod assign;
#[path = "site/create.rs"]
mod create;
#[path = "site/delete.rs"]
mod delete;
#[path = "site/document.rs"]
mod document;
#[path = "site/get.rs"]
mod get;
#[path = "site/list.rs"]
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SiteCommands;
use crate::context::AppContext;

/// Handle `sfw site`.
pub async fn handle(action: &SiteCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        SiteCommands::Create { name, address } => {
            create::run(name, address.as_deref(), ctx, flags).await
        }
        SiteCommands::Get { id } => get::run(id, ctx, flags).await,
        SiteCommands::List => list::run(ctx, flags).await,
        SiteCommands::Assign {
            site_id,
            worker,
            job,
        } => assign::run(site_id, worker, job.as_deref(), ctx, flags).await,
        SiteCommands::Document {
            site_id,
            title,
            kind,
            amount,
        } => document::run(site_id, title, kind, *amount, ctx, flags).await,
        SiteCommands::Delete { id } => delete::run(id, ctx, flags).await,
    }
}
