use anyhow::Context;
use serde_json::{Map, Value, json};
use sf_db::actions;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_date;
use crate::context::AppContext;
use crate::output::output_action;

pub struct Params {
    pub id: String,
    pub expected_version: i64,
    pub patch: Option<String>,
    pub date: Option<String>,
    pub content: Option<String>,
    pub weather: Option<String>,
    pub clear_weather: bool,
    pub headcount: Option<i64>,
    pub clear_headcount: bool,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let patch = build_patch(&params)?;
    let result = actions::update_if_version_matches(
        &ctx.service,
        &params.id,
        params.expected_version,
        patch,
        &flags.role,
        flags.user.as_deref(),
    )
    .await;
    output_action(&result, flags.format)
}

/// Turn `--patch` or the field flags into the JSON patch the workflow takes.
fn build_patch(params: &Params) -> anyhow::Result<Value> {
    if let Some(raw) = params.patch.as_deref() {
        return serde_json::from_str(raw).context("--patch is not valid JSON");
    }

    let mut patch = Map::new();
    if let Some(raw) = params.date.as_deref() {
        patch.insert("work_date".into(), json!(parse_date(raw, "date")?));
    }
    if let Some(content) = &params.content {
        patch.insert("content".into(), json!(content));
    }
    if params.clear_weather {
        patch.insert("weather".into(), Value::Null);
    } else if let Some(weather) = &params.weather {
        patch.insert("weather".into(), json!(weather));
    }
    if params.clear_headcount {
        patch.insert("headcount".into(), Value::Null);
    } else if let Some(headcount) = params.headcount {
        patch.insert("headcount".into(), json!(headcount));
    }
    Ok(Value::Object(patch))
}
