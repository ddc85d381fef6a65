//! alter-migrate - Migration engine for Alter
//!
//! Tracks applied migrations in the `_schema_migrations` table and applies
//! resolved migrations as a single all-or-nothing transaction.

pub mod applier;
pub mod error;
pub mod migrator;
pub mod tracker;

pub use applier::Applier;
pub use error::{MigrateError, MigrateResult};
pub use migrator::Migrator;
pub use tracker::{HistoryTracker, MIGRATION_TABLE};

#[cfg(test)]
pub(crate) mod test_support;
