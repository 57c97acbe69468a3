use sf_db::repos::report::NewReport;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_date;
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub site_id: String,
    pub date: Option<String>,
    pub content: String,
    pub weather: Option<String>,
    pub headcount: Option<i64>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let work_date = match params.date.as_deref() {
        Some(raw) => parse_date(raw, "date")?,
        None => chrono::Local::now().date_naive(),
    };
    let actor = AppContext::actor(flags)?;

    let report = ctx
        .service
        .create_report(
            &NewReport {
                site_id: params.site_id,
                work_date,
                content: params.content,
                weather: params.weather,
                headcount: params.headcount,
            },
            &actor,
        )
        .await?;
    output(&report, flags.format)
}
