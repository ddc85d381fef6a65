//! Migration descriptors, kinds, and the database version scalar.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Version recorded for a database that has never had a migration applied.
///
/// No migration may use this value as its own id.
pub const UNINITIALIZED_VERSION: &str = "0";

/// Substring marking a differential ("squash") migration id.
pub const DIFF_MARKER: &str = "_DIFF_";

/// Substring marking a baseline migration id.
pub const BASELINE_MARKER: &str = "_BASELINE_";

/// The three kinds of migration, detected from the id alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationKind {
    /// Ordinary forward step
    #[default]
    Incremental,
    /// Consolidated replacement for a run of incrementals
    Differential,
    /// Full-schema snapshot, only valid as the first applied state
    Baseline,
}

impl MigrationKind {
    /// Detect the kind of a migration from its id.
    ///
    /// The differential marker is checked first, so an id carrying both
    /// markers is treated as differential.
    pub fn from_id(id: &str) -> Self {
        if id.contains(DIFF_MARKER) {
            MigrationKind::Differential
        } else if id.contains(BASELINE_MARKER) {
            MigrationKind::Baseline
        } else {
            MigrationKind::Incremental
        }
    }

    /// Tag inserted between the timestamp and the description of a new id.
    pub fn tag(self) -> &'static str {
        match self {
            MigrationKind::Incremental => "",
            MigrationKind::Differential => "_DIFF",
            MigrationKind::Baseline => "_BASELINE",
        }
    }
}

impl fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationKind::Incremental => write!(f, "incremental"),
            MigrationKind::Differential => write!(f, "differential"),
            MigrationKind::Baseline => write!(f, "baseline"),
        }
    }
}

/// Strongly-typed wrapper for migration ids.
///
/// Ids compare as plain strings. Generated ids start with a fixed-width
/// timestamp so string order matches creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationId(String);

impl MigrationId {
    /// Wrap an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the underlying id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Kind encoded in this id.
    pub fn kind(&self) -> MigrationKind {
        MigrationKind::from_id(&self.0)
    }

    /// Leading run of ASCII digits, parsed as a timestamp.
    pub fn timestamp(&self) -> Option<u64> {
        let end = self
            .0
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.0.len());
        self.0[..end].parse().ok()
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MigrationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MigrationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for MigrationId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One migration file on disk. The SQL body is loaded on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// Migration id (file name without the `.sql` extension)
    pub id: MigrationId,

    /// Kind derived from the id
    pub kind: MigrationKind,

    /// Path to the SQL file
    pub path: PathBuf,
}

impl Migration {
    /// Create a descriptor, deriving the kind from the id.
    pub fn new(id: impl Into<MigrationId>, path: impl AsRef<Path>) -> Self {
        let id = id.into();
        Self {
            kind: id.kind(),
            id,
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// A migration together with the SQL batch it executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// The descriptor
    pub migration: Migration,

    /// Full statement batch, executed as one command
    pub sql: String,
}

impl MigrationScript {
    /// Id of the wrapped migration.
    pub fn id(&self) -> &MigrationId {
        &self.migration.id
    }
}

/// Id of the last applied migration, or the uninitialized sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DatabaseVersion(String);

impl DatabaseVersion {
    /// Version of a database with no recorded history.
    pub fn uninitialized() -> Self {
        Self(UNINITIALIZED_VERSION.to_string())
    }

    /// Wrap a recorded version string.
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// True when no migration has been applied yet.
    pub fn is_uninitialized(&self) -> bool {
        self.0 == UNINITIALIZED_VERSION
    }

    /// True when the last applied migration was a differential.
    pub fn is_differential(&self) -> bool {
        self.0.contains(DIFF_MARKER)
    }

    /// Return the underlying version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DatabaseVersion {
    fn default() -> Self {
        Self::uninitialized()
    }
}

impl fmt::Display for DatabaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MigrationId> for DatabaseVersion {
    fn from(id: MigrationId) -> Self {
        Self(id.into_inner())
    }
}

impl From<&str> for DatabaseVersion {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for DatabaseVersion {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DatabaseVersion {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
