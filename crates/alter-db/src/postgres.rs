//! Postgres database backend implementation (sqlx)

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Row};
use alter_core::ConnectionProperties;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Connection, Executor, Row as _};
use std::str::FromStr;
use tokio::sync::Mutex;

/// Port used when none is configured
pub const DEFAULT_PORT: u16 = 5432;

/// Postgres database backend
///
/// Connection options are resolved up front; the connection itself is only
/// established by [`Database::open`]. Server notices are routed by sqlx to
/// its own log output, so [`Database::info_message`] stays empty.
pub struct PostgresBackend {
    options: PgConnectOptions,
    conn: Mutex<Option<PgConnection>>,
}

impl PostgresBackend {
    /// Create a backend from prepared connect options
    pub fn new(options: PgConnectOptions) -> Self {
        Self {
            options,
            conn: Mutex::new(None),
        }
    }

    /// Create a backend from a `postgres://` connection string
    pub fn from_connection_string(connection_string: &str) -> DbResult<Self> {
        let options = PgConnectOptions::from_str(connection_string)
            .map_err(|e| DbError::ConnectionError(format!("invalid connection string: {e}")))?;
        Ok(Self::new(options))
    }

    /// Create a backend from connection properties.
    ///
    /// A connection string wins over the discrete host/port/database fields.
    pub fn from_properties(props: &ConnectionProperties) -> DbResult<Self> {
        if let Some(connection_string) = &props.connection_string {
            return Self::from_connection_string(connection_string);
        }

        let mut options = PgConnectOptions::new().port(props.port.unwrap_or(DEFAULT_PORT));
        if let Some(host) = &props.host {
            options = options.host(host);
        }
        if let Some(database) = &props.database {
            options = options.database(database);
        }
        if let Some(username) = &props.username {
            options = options.username(username);
        }
        if let Some(password) = &props.password {
            options = options.password(password);
        }
        Ok(Self::new(options))
    }
}

fn execution_error(err: sqlx::Error) -> DbError {
    DbError::ExecutionError(err.to_string())
}

/// Read a column as text. sqlx refuses to decode non-text types as `String`,
/// so the common scalar types are tried in turn.
fn column_as_string(row: &PgRow, idx: usize) -> DbResult<Option<String>> {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
        return Ok(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return Ok(v.map(|b| b.to_string()));
    }
    row.try_get::<Option<f64>, _>(idx)
        .map(|v| v.map(|f| f.to_string()))
        .map_err(execution_error)
}

#[async_trait]
impl Database for PostgresBackend {
    fn requires_explicit_open(&self) -> bool {
        true
    }

    async fn open(&self) -> DbResult<()> {
        let mut guard = self.conn.lock().await;
        if guard.is_none() {
            let conn = PgConnection::connect_with(&self.options)
                .await
                .map_err(|e| DbError::ConnectionError(e.to_string()))?;
            *guard = Some(conn);
        }
        Ok(())
    }

    async fn close(&self) -> DbResult<()> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.close()
                .await
                .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        }
        Ok(())
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<Option<u64>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::NotConnected)?;
        // Unparameterised SQL goes over the simple-query protocol, which
        // accepts multi-statement batches.
        let result = conn.execute(sql).await.map_err(execution_error)?;
        Ok(Some(result.rows_affected()))
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::NotConnected)?;
        let rows = conn.fetch_all(sql).await.map_err(execution_error)?;

        rows.iter()
            .map(|row| {
                (0..row.len())
                    .map(|i| column_as_string(row, i))
                    .collect::<DbResult<Row>>()
            })
            .collect()
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::NotConnected)?;

        let (schema, table) = match name.rfind('.') {
            Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
            None => (None, name),
        };

        let row = sqlx::query(
            "SELECT EXISTS (
                 SELECT 1 FROM information_schema.tables
                 WHERE table_schema = COALESCE($1, current_schema()) AND table_name = $2
             )",
        )
        .bind(schema)
        .bind(table)
        .fetch_one(&mut *conn)
        .await
        .map_err(execution_error)?;

        row.try_get::<bool, _>(0).map_err(execution_error)
    }

    fn db_type(&self) -> &'static str {
        "postgres"
    }
}
