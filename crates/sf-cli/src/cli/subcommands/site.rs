use clap::Subcommand;

/// Site subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum SiteCommands {
    /// Create a site
    Create {
        /// Site name
        #[arg(long)]
        name: String,

        /// Street address
        #[arg(long)]
        address: Option<String>,
    },
    /// Get site details with its workers and documents
    Get {
        /// Site ID
        id: String,
    },
    /// List sites
    List,
    /// Assign a worker to a site
    Assign {
        /// Site ID
        site_id: String,

        /// Worker user id
        #[arg(long)]
        worker: String,

        /// Job on site (e.g. foreman, electrician)
        #[arg(long)]
        job: Option<String>,
    },
    /// File a document or invoice against a site
    Document {
        /// Site ID
        site_id: String,

        /// Document title
        #[arg(long)]
        title: String,

        /// Kind: document, invoice
        #[arg(long, default_value = "document")]
        kind: String,

        /// Amount in the smallest currency unit
        #[arg(long)]
        amount: Option<i64>,
    },
    /// Delete a site together with its dependents
    Delete {
        /// Site ID
        id: String,
    },
}
