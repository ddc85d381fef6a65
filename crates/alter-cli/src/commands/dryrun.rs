//! Dryrun command implementation - lists the migrations `migrate` would apply

use alter_core::{Migration, MigrationKind};
use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{DryrunArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{indent, print_json, print_table, read_sql};
use crate::context::ProjectContext;

/// A migration that would be applied
#[derive(Debug, Serialize)]
struct PlannedMigration {
    id: String,
    kind: MigrationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    sql: Option<String>,
}

/// Execute the dryrun command
pub(crate) async fn execute(args: &DryrunArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let migrator = ctx.migrator().await?;
    let store = migrator.store();

    let needed: Vec<Migration> = migrator
        .needed_migrations(args.target.as_deref())
        .await
        .context("Failed to resolve needed migrations")?;
    migrator.close().await?;

    let mut planned = Vec::with_capacity(needed.len());
    for migration in needed {
        let sql = if args.sql {
            read_sql(store, &migration.id)?
        } else {
            None
        };
        planned.push(PlannedMigration {
            id: migration.id.into_inner(),
            kind: migration.kind,
            sql,
        });
    }

    match args.output {
        OutputFormat::Json => print_json(&planned),
        OutputFormat::Table => {
            print_plan(&planned);
            Ok(())
        }
    }
}

fn print_plan(planned: &[PlannedMigration]) {
    if planned.is_empty() {
        println!("Database is up to date.");
        return;
    }

    let rows: Vec<Vec<String>> = planned
        .iter()
        .map(|m| vec![m.id.clone(), m.kind.to_string()])
        .collect();
    print_table(&["ID", "KIND"], &rows);

    for m in planned {
        if let Some(sql) = &m.sql {
            println!("\n-- {}", m.id);
            println!("{}", indent(sql));
        }
    }
}
