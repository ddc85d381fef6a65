//! The `Migrator` facade: store, tracker, resolver and applier on one
//! connection.

use crate::applier::Applier;
use crate::error::{MigrateError, MigrateResult};
use crate::tracker::HistoryTracker;
use alter_core::{
    resolve, ConnectionProperties, DatabaseVersion, Migration, MigrationEvent, MigrationStore,
};
use alter_db::{connect, Database};
use std::sync::Arc;

/// Drives migrations for one database using one migrations directory.
pub struct Migrator {
    db: Arc<dyn Database>,
    store: MigrationStore,
}

impl Migrator {
    /// Wrap an adapter, opening it first if it needs an explicit open.
    pub async fn new(db: Arc<dyn Database>, store: MigrationStore) -> MigrateResult<Self> {
        if db.requires_explicit_open() {
            db.open().await.map_err(MigrateError::Connection)?;
            log::debug!("Opened {} connection", db.db_type());
        }
        Ok(Self { db, store })
    }

    /// Build the adapter for `props` and wrap it.
    pub async fn connect(
        props: &ConnectionProperties,
        store: MigrationStore,
    ) -> MigrateResult<Self> {
        let db = connect(props).map_err(MigrateError::Connection)?;
        Self::new(db, store).await
    }

    /// The migrations directory this migrator reads.
    pub fn store(&self) -> &MigrationStore {
        &self.store
    }

    /// The underlying adapter.
    pub fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }

    /// Version recorded in the tracking table, creating the table if needed.
    pub async fn database_version(&self) -> MigrateResult<DatabaseVersion> {
        HistoryTracker::new(self.db.as_ref()).current_version().await
    }

    /// Every applied migration, ordered by id.
    pub async fn history(&self) -> MigrateResult<Vec<MigrationEvent>> {
        HistoryTracker::new(self.db.as_ref()).history().await
    }

    /// Migrations that `migrate` would apply for `target` (`None` or empty
    /// means latest).
    pub async fn needed_migrations(&self, target: Option<&str>) -> MigrateResult<Vec<Migration>> {
        let available = self.store.list()?;
        let current = self.database_version().await?;
        let needed = resolve(&available, &current, target);
        log::debug!(
            "{} of {} migration(s) needed from version {}",
            needed.len(),
            available.len(),
            current
        );
        Ok(needed)
    }

    /// Bring the database to `target` (or latest) and return the events
    /// recorded, in application order.
    pub async fn migrate(&self, target: Option<&str>) -> MigrateResult<Vec<MigrationEvent>> {
        let needed = self.needed_migrations(target).await?;
        let scripts = needed
            .iter()
            .map(|m| self.store.load_script(m))
            .collect::<Result<Vec<_>, _>>()?;
        Applier::new(self.db.as_ref()).apply(&scripts).await
    }

    /// Close the underlying connection.
    pub async fn close(&self) -> MigrateResult<()> {
        self.db.close().await.map_err(MigrateError::Connection)
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
