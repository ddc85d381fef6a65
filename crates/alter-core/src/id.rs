//! Migration id generation.
//!
//! Ids have the shape `<timestamp><kind tag>_<description>`. The timestamp is
//! nanoseconds since the Unix epoch, zero-padded to [`ID_TIMESTAMP_WIDTH`]
//! digits, so string order matches creation order.

use crate::error::{CoreError, CoreResult};
use crate::migration::{MigrationId, MigrationKind};

/// Digits in the timestamp prefix. Wide enough for any `u64`.
pub const ID_TIMESTAMP_WIDTH: usize = 20;

/// Longest description that still fits the tracking table's `varchar(100)` id
/// column after the timestamp and the longest kind tag.
pub const MAX_DESCRIPTION_LEN: usize = 100 - ID_TIMESTAMP_WIDTH - "_BASELINE_".len();

/// Words a description may not contain, since they drive kind detection.
const RESERVED_WORDS: &[&str] = &["DIFF", "BASELINE"];

/// Mints strictly increasing migration ids.
///
/// Holds the last timestamp it handed out; two calls within the same clock
/// tick get consecutive values instead of a duplicate.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Create a generator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the next timestamp is greater than `timestamp`.
    pub fn advance_past(&mut self, timestamp: u64) {
        self.last = self.last.max(timestamp);
    }

    /// Last timestamp handed out (or observed via [`advance_past`](Self::advance_past)).
    pub fn last_timestamp(&self) -> u64 {
        self.last
    }

    /// Produce the next timestamp: the wall clock, or one past the previous
    /// value if the clock has not moved forward.
    pub fn next_timestamp(&mut self) -> u64 {
        let next = now_nanos().max(self.last.saturating_add(1));
        self.last = next;
        next
    }

    /// Mint a new id for a migration with the given description and kind.
    pub fn next_id(&mut self, description: &str, kind: MigrationKind) -> CoreResult<MigrationId> {
        validate_description(description)?;
        let timestamp = self.next_timestamp();
        Ok(format_id(timestamp, ID_TIMESTAMP_WIDTH, description, kind))
    }

    /// Mint a new id that sorts after `newest`.
    ///
    /// Files written by other tools may use a narrower timestamp prefix
    /// (18-digit ticks, `YYYYMMDD` dates) that a 20-digit id sorts before. In
    /// that case the newest prefix is incremented at its own width. Fails
    /// when no such id exists, e.g. `newest` has no numeric prefix or the
    /// increment would gain a digit.
    pub fn next_id_after(
        &mut self,
        newest: &MigrationId,
        description: &str,
        kind: MigrationKind,
    ) -> CoreResult<MigrationId> {
        if let Some(ts) = newest.timestamp() {
            self.advance_past(ts);
        }
        let id = self.next_id(description, kind)?;
        if id > *newest {
            return Ok(id);
        }

        let width = newest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(newest.len());
        let bumped = newest
            .timestamp()
            .and_then(|ts| ts.checked_add(1))
            .map(|ts| format_id(ts, width, description, kind))
            .filter(|id| id > newest);

        bumped.ok_or_else(|| CoreError::IdOrderConflict {
            newest: newest.to_string(),
        })
    }
}

fn format_id(timestamp: u64, width: usize, description: &str, kind: MigrationKind) -> MigrationId {
    MigrationId::new(format!(
        "{timestamp:0width$}{tag}_{description}",
        tag = kind.tag(),
    ))
}

/// Reject descriptions that would corrupt kind detection or the file name.
pub fn validate_description(description: &str) -> CoreResult<()> {
    if description.trim().is_empty() {
        return Err(CoreError::InvalidDescription {
            description: description.to_string(),
            reason: "description must not be empty".to_string(),
        });
    }

    if let Some(reserved) = RESERVED_WORDS
        .iter()
        .copied()
        .find(|w| description.contains(w))
    {
        return Err(CoreError::ReservedDescription {
            description: description.to_string(),
            reserved,
        });
    }

    if description.contains('/') || description.contains('\\') || description.contains("..") {
        return Err(CoreError::InvalidDescription {
            description: description.to_string(),
            reason: "must not contain '/', '\\' or '..'".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::InvalidDescription {
            description: description.to_string(),
            reason: format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
        });
    }

    Ok(())
}

fn now_nanos() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "id_test.rs"]
mod tests;
