use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `sfw` binary.
#[derive(Debug, Parser)]
#[command(name = "sfw", version, about = "siteflow - daily report review workflow")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Role to act as: worker, site_manager, admin
    #[arg(long, global = true, default_value = "worker")]
    pub role: String,

    /// User id recorded on audit entries
    #[arg(short, long, global = true)]
    pub user: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            role: self.role.clone(),
            user: self.user.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::subcommands::{ReportCommands, SiteCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "sfw",
            "--format",
            "raw",
            "--limit",
            "10",
            "--role",
            "admin",
            "report",
            "advance",
            "rpt-1",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.limit, Some(10));
        assert_eq!(cli.role, "admin");
        assert!(matches!(
            cli.command,
            Commands::Report {
                action: ReportCommands::Advance { ref id }
            } if id == "rpt-1"
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sfw",
            "site",
            "list",
            "--format",
            "raw",
            "--quiet",
            "--user",
            "usr-9",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.user.as_deref(), Some("usr-9"));
        assert!(matches!(
            cli.command,
            Commands::Site {
                action: SiteCommands::List
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["sfw", "--format", "xml", "site", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn reject_requires_reason() {
        let parsed = Cli::try_parse_from(["sfw", "report", "reject", "rpt-1"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from([
            "sfw", "report", "reject", "rpt-1", "--reason", "photos missing",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Report {
                action: ReportCommands::Reject { ref reason, .. }
            } if reason == "photos missing"
        ));
    }

    #[test]
    fn update_takes_expected_version_and_nullable_fields() {
        let cli = Cli::try_parse_from([
            "sfw",
            "report",
            "update",
            "rpt-1",
            "--expected-version",
            "3",
            "--content",
            "poured slab",
            "--clear-weather",
        ])
        .expect("cli should parse");

        let Commands::Report {
            action:
                ReportCommands::Update {
                    expected_version,
                    content,
                    clear_weather,
                    patch,
                    ..
                },
        } = cli.command
        else {
            panic!("expected report update");
        };
        assert_eq!(expected_version, 3);
        assert_eq!(content.as_deref(), Some("poured slab"));
        assert!(clear_weather);
        assert!(patch.is_none());
    }

    #[test]
    fn patch_conflicts_with_field_flags() {
        let parsed = Cli::try_parse_from([
            "sfw",
            "report",
            "update",
            "rpt-1",
            "--expected-version",
            "1",
            "--patch",
            "{}",
            "--content",
            "x",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn role_defaults_to_worker() {
        let cli = Cli::try_parse_from(["sfw", "audit"]).expect("cli should parse");
        assert_eq!(cli.global_flags().role, "worker");
    }
}
