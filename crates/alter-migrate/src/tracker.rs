//! Applied-migration history kept in the `_schema_migrations` table.

use crate::error::{MigrateError, MigrateResult};
use alter_core::sql_utils::{quote_ident, quote_literal, truncate_chars};
use alter_core::{DatabaseVersion, MigrationEvent, MigrationId};
use alter_db::{Database, Row};
use chrono::NaiveDate;

/// Name of the tracking table. The same layout is used for every engine.
pub const MIGRATION_TABLE: &str = "_schema_migrations";

/// Width of the tracking table's `log` column.
pub const LOG_MAX_CHARS: usize = 2000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads and writes the tracking table through a borrowed adapter.
pub struct HistoryTracker<'a> {
    db: &'a dyn Database,
}

impl<'a> HistoryTracker<'a> {
    /// Create a tracker over `db`.
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Create the tracking table if it is missing.
    ///
    /// Returns `true` when the table already existed.
    pub async fn ensure_table(&self) -> MigrateResult<bool> {
        let exists = self
            .db
            .relation_exists(MIGRATION_TABLE)
            .await
            .map_err(MigrateError::TableVerification)?;
        if exists {
            return Ok(true);
        }

        let ddl = format!(
            "CREATE TABLE {} (
                id VARCHAR(100) NOT NULL PRIMARY KEY,
                date_applied DATE NOT NULL,
                time_taken INTEGER NOT NULL,
                log VARCHAR({LOG_MAX_CHARS}) NOT NULL
            )",
            table()
        );
        self.db
            .execute_batch(&ddl)
            .await
            .map_err(MigrateError::TableVerification)?;
        log::info!("Created migration table {MIGRATION_TABLE}");
        Ok(false)
    }

    /// Id of the greatest applied migration, or the sentinel when none are.
    ///
    /// Ids are compared byte-wise here rather than with the database's
    /// collation.
    pub async fn current_version(&self) -> MigrateResult<DatabaseVersion> {
        if !self.ensure_table().await? {
            return Ok(DatabaseVersion::uninitialized());
        }

        let rows = self
            .db
            .query_rows(&format!("SELECT id FROM {}", table()))
            .await
            .map_err(MigrateError::HistoryQuery)?;

        let ids = rows
            .iter()
            .map(|row| required(row, 0, "id"))
            .collect::<MigrateResult<Vec<_>>>()?;
        Ok(ids
            .into_iter()
            .max()
            .map_or_else(DatabaseVersion::uninitialized, DatabaseVersion::new))
    }

    /// Every recorded event, ordered by id.
    pub async fn history(&self) -> MigrateResult<Vec<MigrationEvent>> {
        self.ensure_table().await?;

        let sql = format!(
            "SELECT id, CAST(date_applied AS VARCHAR), CAST(time_taken AS VARCHAR), log \
             FROM {}",
            table()
        );
        let rows = self
            .db
            .query_rows(&sql)
            .await
            .map_err(MigrateError::HistoryQuery)?;

        let mut events = rows
            .iter()
            .map(parse_event)
            .collect::<MigrateResult<Vec<_>>>()?;
        events.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(events)
    }

    /// Insert one history row. Runs inside whatever transaction is open on
    /// the adapter.
    pub async fn record(&self, event: &MigrationEvent) -> MigrateResult<()> {
        let time_taken = event.time_taken_ms.clamp(0, i64::from(i32::MAX));
        let sql = format!(
            "INSERT INTO {} (id, date_applied, time_taken, log) \
             VALUES ({}, DATE {}, {}, {})",
            table(),
            quote_literal(event.id.as_str()),
            quote_literal(&event.date_applied.format(DATE_FORMAT).to_string()),
            time_taken,
            quote_literal(truncate_chars(&event.log, LOG_MAX_CHARS)),
        );
        self.db
            .execute_batch(&sql)
            .await
            .map_err(|source| MigrateError::Record {
                id: event.id.to_string(),
                source,
            })?;
        Ok(())
    }
}

fn table() -> String {
    quote_ident(MIGRATION_TABLE)
}

fn required<'r>(row: &'r Row, idx: usize, column: &str) -> MigrateResult<&'r str> {
    row.get(idx)
        .and_then(|v| v.as_deref())
        .ok_or_else(|| MigrateError::InvalidHistoryRow(format!("missing {column}")))
}

fn parse_event(row: &Row) -> MigrateResult<MigrationEvent> {
    let id = required(row, 0, "id")?;
    let date = required(row, 1, "date_applied")?;
    let time_taken = required(row, 2, "time_taken")?;
    let log = row.get(3).and_then(|v| v.clone()).unwrap_or_default();

    let date_applied = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| {
        MigrateError::InvalidHistoryRow(format!("date_applied '{date}' for {id}: {e}"))
    })?;
    let time_taken_ms = time_taken.trim().parse::<i64>().map_err(|e| {
        MigrateError::InvalidHistoryRow(format!("time_taken '{time_taken}' for {id}: {e}"))
    })?;

    Ok(MigrationEvent {
        id: MigrationId::new(id),
        date_applied,
        time_taken_ms,
        log,
    })
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
