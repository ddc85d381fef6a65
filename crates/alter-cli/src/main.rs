//! Alter CLI - keep a database schema in sync with ordered SQL migration files

use alter_core::{CoreError, ErrorKind};
use alter_db::DbError;
use alter_migrate::MigrateError;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod context;

use cli::{Cli, Commands};
use commands::{add, dryrun, history, init, migrate, status};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        Commands::Init(args) => init::execute(args, &cli.global).await,
        Commands::Add(args) => add::execute(args, &cli.global).await,
        Commands::Status => status::execute(&cli.global).await,
        Commands::History(args) => history::execute(args, &cli.global).await,
        Commands::Dryrun(args) => dryrun::execute(args, &cli.global).await,
        Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Send `log` records to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// First classified error in the chain, outermost first.
fn classify(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<MigrateError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<DbError>() {
            Some(e.kind())
        } else {
            cause.downcast_ref::<CoreError>().map(CoreError::kind)
        }
    })
}

fn exit_code(kind: Option<ErrorKind>) -> u8 {
    match kind {
        Some(ErrorKind::UserInput) => 2,
        _ => 1,
    }
}

fn report(err: &anyhow::Error) -> ExitCode {
    let kind = classify(err);
    let header = match kind {
        Some(ErrorKind::UserInput) => "Invalid input",
        Some(ErrorKind::Migration) => "Migration error",
        Some(ErrorKind::Configuration) => "Configuration error",
        None => "Unexpected error",
    };

    eprintln!("{header}: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    if kind == Some(ErrorKind::UserInput) {
        eprintln!("Run 'alter help' for usage.");
    }
    ExitCode::from(exit_code(kind))
}
