//! Error types for the migration engine.

use alter_core::{CoreError, ErrorKind};
use alter_db::DbError;
use thiserror::Error;

/// Migration engine errors. Each wraps its originating cause.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Migration files could not be listed or read (M001).
    #[error("[M001] Error reading migrations. See the cause for details")]
    Store(#[from] CoreError),

    /// Could not open the database connection (M002).
    #[error("[M002] Could not open a connection to the database")]
    Connection(#[source] DbError),

    /// Tracking table lookup or creation failed (M003).
    #[error("[M003] Could not verify or create the migration table")]
    TableVerification(#[source] DbError),

    /// Tracking table could not be read (M004).
    #[error("[M004] Could not query the migration table")]
    HistoryQuery(#[source] DbError),

    /// Tracking table returned a row we cannot interpret (M005).
    #[error("[M005] Invalid migration history row: {0}")]
    InvalidHistoryRow(String),

    /// A migration's SQL failed; the whole run was rolled back (M006).
    #[error("[M006] Migration {id} failed; no migrations from this run were applied")]
    Execution {
        id: String,
        #[source]
        source: DbError,
    },

    /// The history row for a migration could not be written (M007).
    #[error("[M007] Could not record migration {id}; no migrations from this run were applied")]
    Record {
        id: String,
        #[source]
        source: DbError,
    },

    /// BEGIN or COMMIT failed (M008).
    #[error("[M008] Migration transaction failed")]
    Transaction(#[source] DbError),
}

impl MigrateError {
    /// Classify this error for reporting at the process boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MigrateError::Store(e) => e.kind(),
            MigrateError::Connection(e) => e.kind(),
            _ => ErrorKind::Migration,
        }
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
