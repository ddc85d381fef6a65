//! alter-db - Database adapter layer for Alter
//!
//! This crate provides the `Database` trait, the narrow capability contract
//! the migration core needs from a live connection, and implementations for
//! DuckDB and Postgres.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod postgres;
pub mod traits;

pub use connect::connect;
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use postgres::PostgresBackend;
pub use traits::{Database, Row};
