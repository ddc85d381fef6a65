//! Runtime context for CLI commands

use alter_core::{Config, ConnectionProperties, Engine, MigrationStore};
use alter_migrate::Migrator;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Project configuration merged with command-line overrides
pub(crate) struct ProjectContext {
    /// Project directory
    pub root: PathBuf,

    /// Effective configuration (file, then flags and `ALTER_*` variables)
    pub config: Config,
}

impl ProjectContext {
    /// Load the project config and apply global overrides
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);

        let mut config = if let Some(config_path) = &global.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        };

        if let Some(dir) = &global.migrations_dir {
            config.migrations_dir = dir.clone();
        }
        let overrides = global.connection.to_properties();
        config.connection = config.connection.merge(overrides);

        Ok(Self { root, config })
    }

    /// The migrations directory for this project
    pub fn store(&self) -> MigrationStore {
        MigrationStore::new(self.config.migrations_path(&self.root))
    }

    /// Connection properties with a relative DuckDB path resolved against
    /// the project directory.
    pub fn connection(&self) -> ConnectionProperties {
        let mut props = self.config.connection.clone();
        if matches!(props.engine(), Ok(Engine::DuckDb)) && props.connection_string.is_none() {
            if let Some(db) = props.database.as_deref() {
                let path = Path::new(db);
                if db != ":memory:" && path.is_relative() {
                    props.database = Some(self.root.join(path).display().to_string());
                }
            }
        }
        props
    }

    /// Connect to the target database
    pub async fn migrator(&self) -> Result<Migrator> {
        let props = self.connection();
        Migrator::connect(&props, self.store())
            .await
            .context("Failed to connect to the target database")
    }
}
