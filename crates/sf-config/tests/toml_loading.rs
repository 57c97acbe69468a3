//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use sf_config::SiteflowConfig;
use sf_core::errors::Locale;
use sf_core::transitions::RejectPolicy;

#[test]
fn loads_workflow_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[workflow]
reject_policy = "reviewable_only"
cascade_collections = ["daily_reports", "site_workers"]
cascade_fetch_limit = 250
"#,
        )?;

        let config: SiteflowConfig = Figment::from(Serialized::defaults(SiteflowConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.workflow.reject_policy, RejectPolicy::ReviewableOnly);
        assert_eq!(
            config.workflow.cascade_collections,
            ["daily_reports", "site_workers"]
        );
        assert_eq!(config.workflow.cascade_fetch_limit, 250);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_default_chain() {
    Jail::expect_with(|jail| {
        jail.create_dir(".siteflow")?;
        jail.create_file(
            ".siteflow/config.toml",
            r#"
[database]
path = "site.db"

[audit]
journal_dir = ".siteflow/audit"

[general]
locale = "ko"
"#,
        )?;

        let config = SiteflowConfig::load().expect("config loads");
        assert_eq!(config.database.path, "site.db");
        assert!(config.audit.has_journal());
        assert_eq!(config.general.locale, Locale::Ko);
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[audit]
event_capacity = 8
"#,
        )?;

        let config: SiteflowConfig = Figment::from(Serialized::defaults(SiteflowConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.audit.event_capacity, 8);
        assert!(config.audit.journal_dir.is_empty());
        assert_eq!(config.workflow.cascade_fetch_limit, 1000);
        Ok(())
    });
}
