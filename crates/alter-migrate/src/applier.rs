//! All-or-nothing application of a resolved migration batch.

use crate::error::{MigrateError, MigrateResult};
use crate::tracker::HistoryTracker;
use alter_core::{MigrationEvent, MigrationScript};
use alter_db::Database;
use chrono::Local;
use std::time::Instant;

/// Runs migration scripts inside one transaction on a borrowed adapter.
pub struct Applier<'a> {
    db: &'a dyn Database,
}

impl<'a> Applier<'a> {
    /// Create an applier over `db`. The tracking table must already exist.
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Execute `scripts` in order and record one history row for each.
    ///
    /// Everything runs in a single transaction: either every script and its
    /// history row is committed, or the transaction is rolled back and the
    /// error for the failing step is returned. An empty batch never opens a
    /// transaction.
    pub async fn apply(&self, scripts: &[MigrationScript]) -> MigrateResult<Vec<MigrationEvent>> {
        if scripts.is_empty() {
            log::debug!("No migrations to apply");
            return Ok(Vec::new());
        }

        self.db.begin().await.map_err(MigrateError::Transaction)?;

        let events = match self.apply_each(scripts).await {
            Ok(events) => events,
            Err(e) => {
                self.rollback().await;
                return Err(e);
            }
        };

        if let Err(e) = self.db.commit().await {
            self.rollback().await;
            return Err(MigrateError::Transaction(e));
        }
        log::info!("Committed {} migration(s)", events.len());
        Ok(events)
    }

    async fn apply_each(&self, scripts: &[MigrationScript]) -> MigrateResult<Vec<MigrationEvent>> {
        let tracker = HistoryTracker::new(self.db);
        let mut events = Vec::with_capacity(scripts.len());

        for script in scripts {
            log::debug!("Applying {}", script.id());
            let started = Instant::now();
            let rows = self
                .db
                .execute_batch(&script.sql)
                .await
                .map_err(|source| MigrateError::Execution {
                    id: script.id().to_string(),
                    source,
                })?;
            let elapsed = started.elapsed();

            let event = MigrationEvent {
                id: script.id().clone(),
                date_applied: Local::now().date_naive(),
                time_taken_ms: i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
                log: compose_log(rows, &self.db.info_message()),
            };
            tracker.record(&event).await?;
            log::debug!("Applied {} in {}ms", event.id, event.time_taken_ms);
            events.push(event);
        }

        Ok(events)
    }

    async fn rollback(&self) {
        if let Err(e) = self.db.rollback().await {
            log::warn!("Rollback failed: {e}");
        }
    }
}

/// Build the history log line from the affected-row count and driver text.
pub(crate) fn compose_log(rows_affected: Option<u64>, info: &str) -> String {
    let info = info.trim();
    match rows_affected {
        Some(n) if info.is_empty() => format!("{n} row(s) affected."),
        Some(n) => format!("{n} row(s) affected. {info}"),
        None => info.to_string(),
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
