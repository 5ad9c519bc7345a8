//! Clap derive structures for the `postdeck` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use postdeck_core::{ListQuery, SortOrder};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// postdeck -- console for the social automation backend
#[derive(Debug, Parser)]
#[command(
    name = "postdeck",
    version,
    about = "Manage automation accounts, jobs and selectors from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "POSTDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend API base URL (overrides profile)
    #[arg(long, short = 'u', env = "POSTDECK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "POSTDECK_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "POSTDECK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "POSTDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "POSTDECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage automation accounts
    #[command(alias = "acc", alias = "a")]
    Accounts(AccountsArgs),

    /// Manage scheduled and running jobs
    #[command(alias = "j")]
    Jobs(JobsArgs),

    /// Manage per-platform selector sets
    #[command(alias = "sel")]
    Selectors(SelectorsArgs),

    /// View and edit the backend configuration document
    Config(ConfigArgs),

    /// Show dashboard statistics
    #[command(alias = "dash")]
    Dashboard,

    /// Manage local connection profiles
    Profiles(ProfilesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for SortOrder {
    fn from(dir: SortDirection) -> Self {
        match dir {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

/// Shared pagination, sorting and filtering arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Max results per page
    #[arg(long, short = 'l', requires = "page")]
    pub limit: Option<u32>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction [default: asc]
    #[arg(long, requires = "sort")]
    pub order: Option<SortDirection>,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by field value (repeatable, e.g. --filter status=active)
    #[arg(long, short = 'f', value_name = "FIELD=VALUE", value_parser = parse_key_value)]
    pub filter: Vec<(String, String)>,
}

impl ListArgs {
    pub fn to_query(&self) -> ListQuery {
        let mut query = ListQuery::new();
        for (field, value) in &self.filter {
            query = query.filter(field.clone(), value.clone());
        }
        if let Some(page) = self.page {
            query = query.page(page, self.limit.unwrap_or(25));
        }
        if let Some(ref sort) = self.sort {
            let order = self.order.unwrap_or(SortDirection::Asc);
            query = query.sort(sort.clone(), order.into());
        }
        if let Some(ref q) = self.search {
            query = query.search(q.clone());
        }
        query
    }
}

/// Parse `key=value`, splitting on the first `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

/// Arguments shared by every `update` command.
#[derive(Debug, Args)]
pub struct PatchArgs {
    /// Set a field (repeatable). Values are parsed as JSON, falling back to a string
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Read the patch object from a JSON file
    #[arg(long, short = 'F', conflicts_with = "set")]
    pub from_file: Option<PathBuf>,
}

// ── Accounts ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// List accounts
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one account
    Get {
        /// Account ID
        account_id: String,
    },

    /// Show job statistics for an account
    Stats {
        /// Account ID
        account_id: String,
    },

    /// Register a new account
    Create {
        /// Account ID
        account_id: String,

        /// Platform the account lives on
        #[arg(long)]
        platform: Option<String>,

        /// Platform username
        #[arg(long)]
        username: Option<String>,

        /// Human-friendly name
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Update account fields
    Update {
        /// Account ID
        account_id: String,

        #[command(flatten)]
        patch: PatchArgs,
    },

    /// Delete an account
    #[command(alias = "rm")]
    Delete {
        /// Account ID
        account_id: String,
    },
}

// ── Jobs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub command: JobsCommand,
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List jobs
    #[command(alias = "ls")]
    List {
        /// Only jobs of this account
        #[arg(long)]
        account: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one job
    Get {
        /// Job ID
        job_id: String,
    },

    /// Schedule a job for an account
    Create {
        /// Account the job runs as
        #[arg(long)]
        account: String,

        /// Job type (e.g. post, like, follow)
        #[arg(long = "type")]
        job_type: String,

        /// When to run it (ISO-8601)
        #[arg(long)]
        scheduled_at: Option<String>,

        /// Extra job parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },

    /// Update job fields
    Update {
        /// Job ID
        job_id: String,

        #[command(flatten)]
        patch: PatchArgs,
    },

    /// Delete a job
    #[command(alias = "rm")]
    Delete {
        /// Job ID
        job_id: String,
    },
}

// ── Selectors ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SelectorsArgs {
    #[command(subcommand)]
    pub command: SelectorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SelectorsCommand {
    /// List selector sets for every platform
    #[command(alias = "ls")]
    List {
        /// Only this selector version
        #[arg(long)]
        version: Option<String>,
    },

    /// Show the selector set of a platform
    Get {
        /// Platform name
        platform: String,
    },

    /// Show the version history of a platform's selectors
    Versions {
        /// Platform name
        platform: String,
    },

    /// Create a selector set from a JSON file of selectors
    Create {
        /// Platform name
        platform: String,

        /// Version label
        #[arg(long)]
        version: Option<String>,

        /// JSON object mapping selector names to values
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Update a platform's selector set
    Update {
        /// Platform name
        platform: String,

        #[command(flatten)]
        patch: PatchArgs,
    },

    /// Delete a platform's selector set
    #[command(alias = "rm")]
    Delete {
        /// Platform name
        platform: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the whole configuration document
    Show,

    /// Read one value
    Get {
        /// Dot-separated path (e.g. "scheduler.max_workers")
        key: String,
    },

    /// Set one value; the backend deep-merges it into the document
    Set {
        /// Dot-separated path (e.g. "scheduler.max_workers")
        key: String,

        /// Value, parsed as JSON and falling back to a string
        value: String,
    },
}

// ── Profiles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List configured profiles
    #[command(alias = "ls")]
    List,

    /// Print the config file path
    Path,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// Store the active profile's token in the system keyring
    SetToken,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
