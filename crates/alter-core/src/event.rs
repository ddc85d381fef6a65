//! Applied-migration history rows.

use crate::migration::MigrationId;
use chrono::NaiveDate;
use serde::Serialize;

/// One row of the tracking table, written once per applied migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationEvent {
    /// Id of the applied migration
    pub id: MigrationId,

    /// Day the migration was applied (the tracking column is a `date`)
    pub date_applied: NaiveDate,

    /// Wall-clock execution time in milliseconds
    pub time_taken_ms: i64,

    /// Affected-row count plus any driver informational text
    pub log: String,
}
