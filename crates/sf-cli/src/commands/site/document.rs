use sf_core::enums::DocumentKind;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    site_id: &str,
    title: &str,
    kind: &str,
    amount: Option<i64>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let kind: DocumentKind = parse_enum(kind, "kind")?;
    let actor = AppContext::actor(flags)?;
    let document = ctx
        .service
        .add_site_document(site_id, title, kind, amount, &actor)
        .await?;
    output(&document, flags.format)
}
