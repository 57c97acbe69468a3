use sf_core::enums::ReportStatus;
use sf_db::repos::report::ReportFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub site_id: Option<String>,
    pub status: Option<String>,
    pub author: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let status = params
        .status
        .as_deref()
        .map(|raw| parse_enum::<ReportStatus>(raw, "status"))
        .transpose()?;
    let from = params
        .from
        .as_deref()
        .map(|raw| parse_date(raw, "from"))
        .transpose()?;
    let to = params
        .to
        .as_deref()
        .map(|raw| parse_date(raw, "to"))
        .transpose()?;

    let filter = ReportFilter {
        site_id: params.site_id,
        status,
        created_by: params.author,
        from,
        to,
        limit: Some(effective_limit(
            None,
            flags.limit,
            ctx.config.general.default_limit,
        )),
    };
    let reports = ctx.service.list_reports(&filter).await?;
    output(&reports, flags.format)
}
