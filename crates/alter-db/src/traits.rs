//! Database adapter trait definition

use crate::error::{DbError, DbResult};
use async_trait::async_trait;

/// One result row, every column rendered as text (`None` for NULL).
pub type Row = Vec<Option<String>>;

/// The capability contract the migration core needs from a live connection.
///
/// An adapter wraps exactly one connection. Transactions are scoped to that
/// connection: after [`begin`](Self::begin), every command issued through the
/// adapter runs inside the transaction until [`commit`](Self::commit) or
/// [`rollback`](Self::rollback). Callers must not interleave unrelated work
/// on the same adapter while a transaction is open.
#[async_trait]
pub trait Database: Send + Sync {
    /// Whether [`open`](Self::open) must be called before first use
    fn requires_explicit_open(&self) -> bool {
        false
    }

    /// Open the underlying connection
    async fn open(&self) -> DbResult<()> {
        Ok(())
    }

    /// Close the underlying connection
    async fn close(&self) -> DbResult<()> {
        Ok(())
    }

    /// Execute a statement batch, returning affected rows when the driver
    /// reports them
    async fn execute_batch(&self, sql: &str) -> DbResult<Option<u64>>;

    /// Run a query and return every row as text columns
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Check if a table or view exists in the current schema
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Start a transaction on this connection
    async fn begin(&self) -> DbResult<()> {
        self.execute_batch("BEGIN TRANSACTION")
            .await
            .map(|_| ())
            .map_err(|e| transaction_error("BEGIN", e))
    }

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()> {
        self.execute_batch("COMMIT")
            .await
            .map(|_| ())
            .map_err(|e| transaction_error("COMMIT", e))
    }

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()> {
        self.execute_batch("ROLLBACK")
            .await
            .map(|_| ())
            .map_err(|e| transaction_error("ROLLBACK", e))
    }

    /// Most recent driver informational text (may be empty)
    fn info_message(&self) -> String {
        String::new()
    }

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

fn transaction_error(action: &'static str, err: DbError) -> DbError {
    DbError::TransactionError {
        action,
        message: err.to_string(),
    }
}
