use std::path::PathBuf;

use braindrop_core::TagOrder;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "braindrop")]
#[command(about = "Browse a local copy of your raindrop.io bookmarks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local data file
    #[arg(long, global = true, value_name = "PATH")]
    pub data_path: Option<PathBuf>,

    /// Raindrop API token (overrides BRAINDROP_API_TOKEN and the saved token)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download raindrops when the server has newer data
    Sync {
        /// Download even if the local copy looks current
        #[arg(long)]
        force: bool,
    },
    /// List raindrops
    #[command(alias = "ls")]
    List {
        /// Collection ID or name (defaults to all raindrops)
        #[arg(short, long, value_name = "ID|NAME")]
        collection: Option<String>,
        /// Only raindrops carrying these tags
        #[arg(short, long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Only raindrops whose title, excerpt, note or link contain this text
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,
        /// Number of raindrops to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the details of one raindrop
    Show {
        /// Raindrop ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the collection tree
    Collections {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tags with usage counts
    Tags {
        /// Collection ID or name (defaults to all raindrops)
        #[arg(short, long, value_name = "ID|NAME")]
        collection: Option<String>,
        /// Most used first instead of alphabetical
        #[arg(long)]
        by_count: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what is stored locally
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a Raindrop API token (positional, or the global --token)
    Login {
        /// Test token from <https://app.raindrop.io/settings/integrations>
        #[arg(value_name = "TOKEN")]
        api_token: Option<String>,
    },
    /// Remove the saved token and the local data
    Logout,
    /// Show or change CLI settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum TagOrderArg {
    Name,
    Count,
}

impl From<TagOrderArg> for TagOrder {
    fn from(value: TagOrderArg) -> Self {
        match value {
            TagOrderArg::Name => Self::Name,
            TagOrderArg::Count => Self::Count,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,
    /// Update one or more settings
    Set {
        /// Raindrop API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// HTTP timeout in seconds
        #[arg(long, value_name = "SECONDS")]
        timeout_secs: Option<u64>,
        /// Default tag ordering for `braindrop tags`
        #[arg(long, value_enum)]
        tag_order: Option<TagOrderArg>,
        /// Forget all settings and start from the defaults
        #[arg(long)]
        reset: bool,
    },
}
