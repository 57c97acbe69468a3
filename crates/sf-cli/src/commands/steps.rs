use anyhow::Context;
use sf_core::steps::Step;
use sf_db::actions;
use tokio::io::AsyncReadExt;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StepsArgs;
use crate::context::AppContext;
use crate::output::output_action;

/// Handle `sfw steps`.
pub async fn handle(args: &StepsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = if args.file == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read steps from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(&args.file)
            .await
            .with_context(|| format!("failed to read {}", args.file))?
    };
    let steps = parse_steps(&raw)?;
    tracing::debug!(count = steps.len(), "steps: running batch");

    let result =
        actions::run_steps_with_rollback(&ctx.service, &steps, &flags.role, flags.user.as_deref())
            .await;
    output_action(&result, flags.format)
}

fn parse_steps(raw: &str) -> anyhow::Result<Vec<Step>> {
    serde_json::from_str(raw).context("steps file must be a JSON array of steps")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::enums::StepAction;

    #[test]
    fn parses_step_array() {
        let steps = parse_steps(
            r#"[
                {"collection": "site_workers", "action": "insert", "data": {"site_id": "sit-1", "worker_id": "usr-2"}},
                {"collection": "site_documents", "action": "delete", "data": {"id": "doc-1"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action, StepAction::Insert);
        assert!(steps[0].compensation.is_none());
        assert_eq!(steps[1].collection, "site_documents");
    }

    #[test]
    fn rejects_non_array() {
        assert!(parse_steps(r#"{"collection": "sites"}"#).is_err());
    }
}
