//! # sf-config
//!
//! Layered configuration loading for siteflow using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SITEFLOW_*` prefix, `__` as separator)
//! 2. Project-level `.siteflow/config.toml`
//! 3. User-level `~/.config/siteflow/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SITEFLOW_DATABASE__PATH` -> `database.path`,
//! `SITEFLOW_WORKFLOW__REJECT_POLICY` -> `workflow.reject_policy`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sf_config::SiteflowConfig;
//!
//! let config = SiteflowConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod audit;
mod database;
mod error;
mod general;
mod workflow;

pub use audit::AuditConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use workflow::WorkflowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteflowConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SiteflowConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can layer extra providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".siteflow/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SITEFLOW_").split("__"))
    }

    /// Reject values that would make the workflow misbehave.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(invalid("database.path", "must not be empty"));
        }
        if self.workflow.cascade_fetch_limit == 0 {
            return Err(invalid("workflow.cascade_fetch_limit", "must be at least 1"));
        }
        if let Some(bad) = self
            .workflow
            .cascade_collections
            .iter()
            .find(|c| !is_identifier(c))
        {
            return Err(invalid(
                "workflow.cascade_collections",
                &format!("'{bad}' is not a valid table name"),
            ));
        }
        if self.audit.event_capacity == 0 {
            return Err(invalid("audit.event_capacity", "must be at least 1"));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("siteflow").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
