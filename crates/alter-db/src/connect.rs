//! Adapter selection from connection properties.

use crate::duckdb::DuckDbBackend;
use crate::error::DbResult;
use crate::postgres::PostgresBackend;
use crate::traits::Database;
use alter_core::{ConnectionProperties, Engine};
use std::sync::Arc;

/// Build the adapter for the engine named in `props`.
///
/// Unknown or unimplemented engines surface as configuration errors. The
/// returned adapter is not opened yet when it
/// [requires an explicit open](Database::requires_explicit_open).
pub fn connect(props: &ConnectionProperties) -> DbResult<Arc<dyn Database>> {
    let engine = props.engine()?;
    log::debug!("Building {engine} adapter");

    let db: Arc<dyn Database> = match engine {
        Engine::Postgres => Arc::new(PostgresBackend::from_properties(props)?),
        Engine::DuckDb => {
            let path = props
                .connection_string
                .as_deref()
                .or(props.database.as_deref())
                .unwrap_or(":memory:");
            Arc::new(DuckDbBackend::new(path)?)
        }
    };
    Ok(db)
}
