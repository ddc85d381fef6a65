//! History command implementation - lists applied migrations

use alter_core::MigrationEvent;
use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{GlobalArgs, HistoryArgs, OutputFormat};
use crate::commands::common::{indent, print_json, print_table, read_sql};
use crate::context::ProjectContext;

/// One applied migration as shown by `history`
#[derive(Debug, Serialize)]
struct HistoryEntry {
    #[serde(flatten)]
    event: MigrationEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    sql: Option<String>,
}

/// Execute the history command
pub(crate) async fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let migrator = ctx.migrator().await?;
    let store = migrator.store();

    let events = migrator
        .history()
        .await
        .context("Failed to read migration history")?;
    migrator.close().await?;

    let mut entries = Vec::with_capacity(events.len());
    for event in events {
        let sql = if args.sql {
            read_sql(store, &event.id)?
        } else {
            None
        };
        entries.push(HistoryEntry { event, sql });
    }

    match args.output {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Table => {
            print_history_table(&entries, args);
            Ok(())
        }
    }
}

fn print_history_table(entries: &[HistoryEntry], args: &HistoryArgs) {
    if entries.is_empty() {
        println!("No migrations have been applied.");
        return;
    }

    if !args.sql && !args.log {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| {
                vec![
                    e.event.id.to_string(),
                    e.event.date_applied.to_string(),
                    e.event.time_taken_ms.to_string(),
                ]
            })
            .collect();
        print_table(&["ID", "APPLIED", "TIME (ms)"], &rows);
        return;
    }

    for entry in entries {
        let e = &entry.event;
        println!("{}  {}  {}ms", e.id, e.date_applied, e.time_taken_ms);
        if args.sql {
            println!("  SQL:");
            match &entry.sql {
                Some(sql) => println!("{}", indent(sql)),
                None => println!("    (migration file not found)"),
            }
        }
        if args.log {
            println!("  Log:");
            println!("{}", indent(&e.log));
        }
    }
}
