use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2025-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "facets",
    bin_name = "facets",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Rule expressions:\n  title:contains:guide   tags:is:new,featured   publishedAt:is:last_month\n  publishedAt:is_between:2025-01-01..2025-01-31   locked:is_true\n\nRun `facets fields` for the fields and operators available."
)]
#[command(about = "Filter content records and manage saved views", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding facets.toml and saved views
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Filter bar and sidebar state, as flags.
#[derive(Args, Debug, Default, Clone)]
pub struct StateArgs {
    /// Filter rule as field:operator[:value] (repeatable)
    #[arg(short, long = "filter", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// Sort as field[:asc|desc]
    #[arg(short, long, value_name = "EXPR")]
    pub sort: Option<String>,

    /// Show the status tab as a filter rule
    #[arg(long)]
    pub status_filter: bool,

    /// Restrict to a CMS type (e.g. article)
    #[arg(long, value_name = "TYPE")]
    pub cms_type: Option<String>,
}

impl StateArgs {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
            && self.sort.is_none()
            && !self.status_filter
            && self.cms_type.is_none()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter and sort records from a JSON file
    #[command(alias = "ls", display_order = 1)]
    List {
        /// JSON file of records or API posts
        #[arg(short, long, value_name = "FILE")]
        records: PathBuf,

        #[command(flatten)]
        state: StateArgs,

        /// Status tab: all, published, scheduled, drafts, pending
        #[arg(short, long)]
        tab: Option<String>,

        /// Dashboard route section (e.g. draft, scheduled, article)
        #[arg(long, value_name = "SECTION")]
        section: Option<String>,

        /// Start from a saved view (id or name)
        #[arg(long, value_name = "VIEW")]
        view: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List filterable fields and their operators
    #[command(display_order = 2)]
    Fields {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage saved views
    #[command(display_order = 3)]
    Views {
        #[command(subcommand)]
        action: Option<ViewCommands>,
    },

    /// Get or set configuration
    #[command(display_order = 4)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ViewCommands {
    /// List saved views
    #[command(alias = "ls")]
    List,

    /// Show one view
    Show {
        /// View id or name
        view: String,
    },

    /// Save the given state as a new view
    Save {
        /// View name
        name: String,

        #[command(flatten)]
        state: StateArgs,

        /// Tab the status filter refers to (for the preview)
        #[arg(short, long)]
        tab: Option<String>,
    },

    /// Change a view's name or state
    Update {
        /// View id or name
        view: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        state: StateArgs,

        /// Remove all filter rules
        #[arg(long, conflicts_with = "filters")]
        clear_filters: bool,

        /// Remove the sort
        #[arg(long, conflicts_with = "sort")]
        clear_sort: bool,

        /// Hide the status filter
        #[arg(long, conflicts_with = "status_filter")]
        no_status_filter: bool,

        /// Remove the CMS type
        #[arg(long, conflicts_with = "cms_type")]
        clear_cms_type: bool,
    },

    /// Delete a view
    #[command(alias = "rm")]
    Delete {
        /// View id or name
        view: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print one configuration value
    Get { key: String },

    /// Write a configuration value
    Set { key: String, value: String },

    /// Generate a commented facets.toml
    Gen {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
