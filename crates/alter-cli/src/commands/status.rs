//! Status command implementation - prints the target database's version

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::ProjectContext;

/// Execute the status command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let migrator = ctx.migrator().await?;

    let version = migrator
        .database_version()
        .await
        .context("Failed to read the database version")?;
    println!("{version}");

    migrator.close().await?;
    Ok(())
}
