//! CLI argument definitions using clap derive API

use alter_core::{ConnectionProperties, MigrationKind};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

/// Alter - keep a database schema in sync with ordered SQL migration files
#[derive(Parser, Debug)]
#[command(name = "alter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the migrations directory (relative to the project directory)
    #[arg(long, global = true, env = "ALTER_MIGRATIONS_DIR")]
    pub migrations_dir: Option<String>,

    /// Connection overrides
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Connection properties given on the command line or through `ALTER_*`
/// environment variables. Each one overrides the matching `alter.yml` key.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Database engine (postgres, duckdb)
    #[arg(short = 'e', long, global = true, env = "ALTER_ENGINE")]
    pub engine: Option<String>,

    /// Database server host
    #[arg(long, global = true, env = "ALTER_HOST")]
    pub host: Option<String>,

    /// Database server port
    #[arg(long, global = true, env = "ALTER_PORT")]
    pub port: Option<u16>,

    /// Database name (DuckDB: file path)
    #[arg(short = 'd', long, global = true, env = "ALTER_DATABASE")]
    pub database: Option<String>,

    /// Login user
    #[arg(
        short = 'u',
        long = "user",
        alias = "username",
        global = true,
        env = "ALTER_USER"
    )]
    pub username: Option<String>,

    /// Login password
    #[arg(short = 'W', long, global = true, env = "ALTER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Full connection string, used instead of the discrete fields
    #[arg(
        long,
        global = true,
        env = "ALTER_CONNECTION_STRING",
        hide_env_values = true
    )]
    pub connection_string: Option<String>,
}

impl ConnectionArgs {
    /// The flags as connection properties, for overlaying on the config file.
    pub fn to_properties(&self) -> ConnectionProperties {
        ConnectionProperties {
            engine: self.engine.clone(),
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            connection_string: self.connection_string.clone(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the migrations directory and a starter alter.yml
    Init(InitArgs),

    /// Add a new migration file
    Add(AddArgs),

    /// Print the version of the target database
    Status,

    /// Show the migrations applied to the target database
    History(HistoryArgs),

    /// Show the migrations `migrate` would apply, without applying them
    Dryrun(DryrunArgs),

    /// Apply needed migrations to the target database in one transaction
    Migrate(MigrateArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Only create the migrations directory
    #[arg(long)]
    pub no_config: bool,
}

/// Arguments for the add command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("kind").args(["diff", "incremental", "baseline"])))]
pub struct AddArgs {
    /// Description appended to the generated migration id
    #[arg(short = 'i', long, visible_alias = "id")]
    pub description: String,

    /// SQL batch to write into the new file
    #[arg(short = 's', long, default_value = "")]
    pub sql: String,

    /// Create a differential migration that replaces earlier incrementals
    #[arg(short = 'D', long)]
    pub diff: bool,

    /// Create an incremental migration (the default)
    #[arg(short = 'I', long)]
    pub incremental: bool,

    /// Create a baseline migration for new databases
    #[arg(short = 'b', long)]
    pub baseline: bool,
}

impl AddArgs {
    /// Migration kind selected by the flags.
    pub fn kind(&self) -> MigrationKind {
        if self.diff {
            MigrationKind::Differential
        } else if self.baseline {
            MigrationKind::Baseline
        } else {
            MigrationKind::Incremental
        }
    }
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Include each migration's SQL
    #[arg(short = 's', long)]
    pub sql: bool,

    /// Include each migration's log output (always present in JSON)
    #[arg(short = 'l', long)]
    pub log: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the dryrun command
#[derive(Args, Debug)]
pub struct DryrunArgs {
    /// Include each migration's SQL
    #[arg(short = 's', long)]
    pub sql: bool,

    /// Stop at this migration id instead of the newest
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Stop at this migration id instead of the newest
    #[arg(short = 't', long)]
    pub target: Option<String>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
