//! Error types for alter-core

use thiserror::Error;

/// How an error should be treated at the process boundary.
///
/// Every error type in the workspace maps onto one of these so the binary
/// can pick an exit status without inspecting individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed invocation. Never touches database state.
    UserInput,
    /// File I/O, tracking-table or SQL execution failure.
    Migration,
    /// Unsupported engine or structurally invalid project setup. Fatal.
    Configuration,
}

/// Core error type for Alter
#[derive(Error, Debug)]
pub enum CoreError {
    /// A001: Description contains a reserved kind marker
    #[error("[A001] The migration description cannot contain {reserved}: '{description}'")]
    ReservedDescription {
        description: String,
        reserved: &'static str,
    },

    /// A002: Description is unusable as part of a file name
    #[error("[A002] Invalid migration description '{description}': {reason}")]
    InvalidDescription { description: String, reason: String },

    /// A003: A migration file uses the uninitialized sentinel as its id
    #[error("[A003] You cannot use 0 as a migration id (found {path})")]
    ReservedMigrationId { path: String },

    /// A004: Migrations directory is missing
    #[error("[A004] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// A005: No migration file for the requested id
    #[error("[A005] Migration not found: {id}")]
    MigrationNotFound { id: String },

    /// A006: IO error with file path context
    #[error("[A006] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// A007: Engine is recognised but has no adapter
    #[error("[A007] The {engine} adapter is not implemented")]
    EngineNotImplemented { engine: String },

    /// A008: Engine name is unknown
    #[error("[A008] No adapter named '{engine}' was found")]
    UnknownEngine { engine: String },

    /// A009: Configuration file not found
    #[error("[A009] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// A010: Invalid configuration value
    #[error("[A010] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// A011: Configuration parse error
    #[error("[A011] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// A012: Existing ids leave no room for a new one that sorts last
    #[error(
        "[A012] Cannot create an id that sorts after existing migration '{newest}'; \
         rename it to start with a numeric timestamp"
    )]
    IdOrderConflict { newest: String },
}

impl CoreError {
    /// Classify this error for reporting at the process boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ReservedDescription { .. } | CoreError::InvalidDescription { .. } => {
                ErrorKind::UserInput
            }
            CoreError::MigrationsDirNotFound { .. }
            | CoreError::MigrationNotFound { .. }
            | CoreError::IoWithPath { .. } => ErrorKind::Migration,
            CoreError::ReservedMigrationId { .. }
            | CoreError::IdOrderConflict { .. }
            | CoreError::EngineNotImplemented { .. }
            | CoreError::UnknownEngine { .. }
            | CoreError::ConfigNotFound { .. }
            | CoreError::ConfigInvalid { .. }
            | CoreError::YamlParse(_) => ErrorKind::Configuration,
        }
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
