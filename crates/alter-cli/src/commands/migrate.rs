//! Migrate command implementation - applies needed migrations

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::context::ProjectContext;

/// Execute the migrate command
pub(crate) async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let migrator = ctx.migrator().await?;

    let events = migrator
        .migrate(args.target.as_deref())
        .await
        .context("Migration failed; the database was left at its previous version")?;

    if events.is_empty() {
        println!("Database is up to date.");
    } else {
        for event in &events {
            println!("Applied {} ({}ms)", event.id, event.time_taken_ms);
        }
        let version = migrator
            .database_version()
            .await
            .context("Failed to read the database version")?;
        println!("Database is now at version {version}");
    }

    migrator.close().await?;
    Ok(())
}
