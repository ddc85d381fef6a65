//! Error types for alter-db

use alter_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction control error (D003)
    #[error("[D003] Transaction {action} failed: {message}")]
    TransactionError {
        action: &'static str,
        message: String,
    },

    /// Connection used before it was opened (D004)
    #[error("[D004] Database connection is not open")]
    NotConnected,

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Connection properties could not be turned into an adapter
    #[error(transparent)]
    Config(#[from] CoreError),
}

impl DbError {
    /// Classify this error for reporting at the process boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Config(e) => e.kind(),
            _ => ErrorKind::Migration,
        }
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
