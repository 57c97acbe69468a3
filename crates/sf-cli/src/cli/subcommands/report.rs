use clap::Subcommand;

/// Daily report subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Create a draft report
    Create {
        /// Site ID
        #[arg(long)]
        site: String,

        /// Work date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Report body
        #[arg(long)]
        content: String,

        /// Weather on site
        #[arg(long)]
        weather: Option<String>,

        /// Workers on site
        #[arg(long)]
        headcount: Option<i64>,
    },
    /// Get report details
    Get {
        /// Report ID
        id: String,
    },
    /// List reports
    List {
        /// Filter by site
        #[arg(long)]
        site: Option<String>,

        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Filter by author
        #[arg(long)]
        author: Option<String>,

        /// Earliest work date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Latest work date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Move a report to its next status as the acting role
    Advance {
        /// Report ID
        id: String,
    },
    /// Reject a report with a reason
    Reject {
        /// Report ID
        id: String,

        /// Why the report was sent back
        #[arg(long)]
        reason: String,
    },
    /// Update report fields if the stored version still matches
    Update {
        /// Report ID
        id: String,

        /// Version the edit was based on
        #[arg(long)]
        expected_version: i64,

        /// Full JSON patch instead of field flags
        #[arg(long, conflicts_with_all = ["date", "content", "weather", "clear_weather", "headcount", "clear_headcount"])]
        patch: Option<String>,

        /// New work date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New report body
        #[arg(long)]
        content: Option<String>,

        /// New weather
        #[arg(long, conflicts_with = "clear_weather")]
        weather: Option<String>,

        /// Clear the weather field
        #[arg(long)]
        clear_weather: bool,

        /// New headcount
        #[arg(long, conflicts_with = "clear_headcount")]
        headcount: Option<i64>,

        /// Clear the headcount field
        #[arg(long)]
        clear_headcount: bool,
    },
    /// Delete a draft report
    Delete {
        /// Report ID
        id: String,
    },
}
