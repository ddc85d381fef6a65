//! alter-core - Core library for Alter
//!
//! This crate provides the migration descriptor model, identifier
//! generation, the on-disk migration store, configuration parsing, and the
//! version resolver that decides which migrations a database still needs.

pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod migration;
pub mod resolve;
pub mod sql_utils;
pub mod store;

pub use config::{Config, ConnectionProperties, Engine};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use event::MigrationEvent;
pub use id::IdGenerator;
pub use migration::{
    DatabaseVersion, Migration, MigrationId, MigrationKind, MigrationScript, UNINITIALIZED_VERSION,
};
pub use resolve::resolve;
pub use store::{MigrationStore, DEFAULT_MIGRATIONS_DIR};
