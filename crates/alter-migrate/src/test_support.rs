//! Adapter doubles for applier and migrator tests.

use alter_db::{Database, DbError, DbResult, DuckDbBackend, Row};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory DuckDB adapter that records every call and can report canned
/// row counts and driver text.
pub(crate) struct RecordingDb {
    inner: DuckDbBackend,
    calls: Mutex<Vec<String>>,
    pub rows_affected: Option<u64>,
    pub info: String,
    pub fail_commit: bool,
    pub explicit_open: bool,
}

impl RecordingDb {
    pub fn new() -> Self {
        Self {
            inner: DuckDbBackend::in_memory().unwrap(),
            calls: Mutex::new(Vec::new()),
            rows_affected: None,
            info: String::new(),
            fail_commit: false,
            explicit_open: false,
        }
    }

    /// Calls seen so far, with SQL batches reduced to their first word.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl Database for RecordingDb {
    fn requires_explicit_open(&self) -> bool {
        self.explicit_open
    }

    async fn open(&self) -> DbResult<()> {
        self.push("OPEN");
        Ok(())
    }

    async fn close(&self) -> DbResult<()> {
        self.push("CLOSE");
        Ok(())
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<Option<u64>> {
        let verb = sql.split_whitespace().next().unwrap_or_default();
        self.push(verb.to_uppercase());
        self.inner.execute_batch(sql).await?;
        Ok(self.rows_affected)
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.inner.query_rows(sql).await
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.inner.relation_exists(name).await
    }

    async fn begin(&self) -> DbResult<()> {
        self.push("BEGIN");
        self.inner.begin().await
    }

    async fn commit(&self) -> DbResult<()> {
        self.push("COMMIT");
        if self.fail_commit {
            return Err(DbError::TransactionError {
                action: "COMMIT",
                message: "refused".to_string(),
            });
        }
        self.inner.commit().await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.push("ROLLBACK");
        self.inner.rollback().await
    }

    fn info_message(&self) -> String {
        self.info.clone()
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}
