use anyhow::Context;
use sf_config::SiteflowConfig;
use sf_core::identity::Actor;
use sf_db::service::WorkflowService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: WorkflowService,
    pub config: SiteflowConfig,
}

impl AppContext {
    pub async fn init(config: SiteflowConfig) -> anyhow::Result<Self> {
        let service = WorkflowService::from_config(&config)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        Ok(Self { service, config })
    }

    /// The acting user for mutations, from `--role` and `--user`.
    pub fn actor(flags: &GlobalFlags) -> anyhow::Result<Actor> {
        Actor::parse(&flags.role, flags.user.as_deref()).map_err(anyhow::Error::from)
    }
}
