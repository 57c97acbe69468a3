#[path = "report/create.rs"]
mod create;
#[path = "report/delete.rs"]
mod delete;
#[path = "report/list.rs"]
mod list;
#[path = "report/transition.rs"]
mod transition;
#[path = "report/update.rs"]
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReportCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sfw report`.
pub async fn handle(
    action: &ReportCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ReportCommands::Create {
            site,
            date,
            content,
            weather,
            headcount,
        } => {
            let params = create::Params {
                site_id: site.clone(),
                date: date.clone(),
                content: content.clone(),
                weather: weather.clone(),
                headcount: *headcount,
            };
            create::run(params, ctx, flags).await
        }
        ReportCommands::Get { id } => {
            let report = ctx.service.get_report(id).await?;
            output(&report, flags.format)
        }
        ReportCommands::List {
            site,
            status,
            author,
            from,
            to,
        } => {
            let params = list::Params {
                site_id: site.clone(),
                status: status.clone(),
                author: author.clone(),
                from: from.clone(),
                to: to.clone(),
            };
            list::run(params, ctx, flags).await
        }
        ReportCommands::Advance { id } => transition::advance(id, ctx, flags).await,
        ReportCommands::Reject { id, reason } => transition::reject(id, reason, ctx, flags).await,
        ReportCommands::Update {
            id,
            expected_version,
            patch,
            date,
            content,
            weather,
            clear_weather,
            headcount,
            clear_headcount,
        } => {
            let params = update::Params {
                id: id.clone(),
                expected_version: *expected_version,
                patch: patch.clone(),
                date: date.clone(),
                content: content.clone(),
                weather: weather.clone(),
                clear_weather: *clear_weather,
                headcount: *headcount,
                clear_headcount: *clear_headcount,
            };
            update::run(params, ctx, flags).await
        }
        ReportCommands::Delete { id } => delete::run(id, ctx, flags).await,
    }
}
