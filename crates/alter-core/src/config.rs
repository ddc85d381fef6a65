//! Configuration types and parsing for alter.yml

use crate::error::{CoreError, CoreResult};
use crate::store::DEFAULT_MIGRATIONS_DIR;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Project configuration from alter.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing migration files, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Target database connection
    #[serde(default)]
    pub connection: ConnectionProperties,
}

fn default_migrations_dir() -> String {
    DEFAULT_MIGRATIONS_DIR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            connection: ConnectionProperties::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for alter.yml or alter.yaml; a project without either uses the
    /// defaults.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("alter.yml");
        let yaml_path = dir.join("alter.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            log::debug!("No alter.yml in {}, using defaults", dir.display());
            Ok(Self::default())
        }
    }

    /// Absolute (project-relative) path of the migrations directory.
    pub fn migrations_path(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }
        if let Some(engine) = &self.connection.engine {
            Engine::from_str(engine)?;
        }
        Ok(())
    }
}

/// Properties used to build a database adapter.
///
/// Either the discrete fields or a pre-built `connection_string` may be
/// given; the connection string wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionProperties {
    /// Engine name (postgres, duckdb)
    #[serde(default)]
    pub engine: Option<String>,

    /// Database server host
    #[serde(default)]
    pub host: Option<String>,

    /// Database server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Database name (DuckDB: file path or `:memory:`)
    #[serde(default)]
    pub database: Option<String>,

    /// Login user
    #[serde(default)]
    pub username: Option<String>,

    /// Login password
    #[serde(default)]
    pub password: Option<String>,

    /// Pre-built connection string
    #[serde(default)]
    pub connection_string: Option<String>,
}

impl ConnectionProperties {
    /// Overlay `overrides` on top of `self`: every field set in `overrides`
    /// replaces the corresponding field here.
    pub fn merge(self, overrides: ConnectionProperties) -> Self {
        Self {
            engine: overrides.engine.or(self.engine),
            host: overrides.host.or(self.host),
            port: overrides.port.or(self.port),
            database: overrides.database.or(self.database),
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
            connection_string: overrides.connection_string.or(self.connection_string),
        }
    }

    /// Parse the configured engine.
    pub fn engine(&self) -> CoreResult<Engine> {
        match self.engine.as_deref() {
            Some(name) => name.parse(),
            None => Err(CoreError::ConfigInvalid {
                message: "no database engine configured (set connection.engine or --engine)"
                    .to_string(),
            }),
        }
    }
}

/// Supported database engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// PostgreSQL
    Postgres,
    /// DuckDB (file or in-memory)
    DuckDb,
}

/// Engines people ask for that have no adapter yet.
const UNIMPLEMENTED_ENGINES: &[&str] = &["sqlserver", "oracle", "sqlite", "mysql"];

impl FromStr for Engine {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "postgres" | "postgresql" => Ok(Engine::Postgres),
            "duckdb" => Ok(Engine::DuckDb),
            other if UNIMPLEMENTED_ENGINES.contains(&other) => {
                Err(CoreError::EngineNotImplemented { engine: name })
            }
            _ => Err(CoreError::UnknownEngine {
                engine: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Postgres => write!(f, "postgres"),
            Engine::DuckDb => write!(f, "duckdb"),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
