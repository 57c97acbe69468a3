use std::path::Path;

use anyhow::{Context, bail};
use serde::Serialize;
use sf_config::SiteflowConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

const CONFIG_PATH: &str = ".siteflow/config.toml";

#[derive(Debug, Serialize)]
struct InitResponse {
    config_path: String,
    database_path: String,
}

/// Handle `sfw init`.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() && !args.force {
        bail!("{CONFIG_PATH} already exists (use --force to overwrite)");
    }

    let config = SiteflowConfig::default();
    let rendered = render_default_config(&config)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, rendered)
        .await
        .with_context(|| format!("failed to write {CONFIG_PATH}"))?;
    tracing::info!(path = CONFIG_PATH, "init: wrote default config");

    output(
        &InitResponse {
            config_path: CONFIG_PATH.to_string(),
            database_path: config.database.path,
        },
        flags.format,
    )
}

fn render_default_config(config: &SiteflowConfig) -> anyhow::Result<String> {
    toml::to_string_pretty(config).context("failed to render default config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_renders_and_reads_back() {
        let rendered = render_default_config(&SiteflowConfig::default()).unwrap();
        assert!(rendered.contains("[database]"));
        assert!(rendered.contains("reject_policy = \"any_status\""));

        let parsed: SiteflowConfig = toml::from_str(&rendered).unwrap();
        parsed.validate().unwrap();
        assert_eq!(parsed.general.default_limit, 20);
    }
}
