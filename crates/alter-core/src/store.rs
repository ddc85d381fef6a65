//! On-disk migration store.
//!
//! Each migration is one `<id>.sql` file in a single directory. The store
//! enumerates them in id order, reads their SQL on demand, and writes new
//! files for freshly minted ids.

use crate::error::{CoreError, CoreResult};
use crate::id::{validate_description, IdGenerator};
use crate::migration::{
    Migration, MigrationId, MigrationKind, MigrationScript, UNINITIALIZED_VERSION,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default directory holding migration files, relative to the project root.
pub const DEFAULT_MIGRATIONS_DIR: &str = "SchemaMigrations";

/// File extension of migration files.
pub const MIGRATION_EXTENSION: &str = "sql";

/// Migration files in one directory.
#[derive(Debug, Clone)]
pub struct MigrationStore {
    dir: PathBuf,
}

impl MigrationStore {
    /// Create a store rooted at `dir`. The directory is not touched.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the migration files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it is missing. Returns `true` if it was created.
    pub fn init(&self) -> CoreResult<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.dir).map_err(|e| self.io_error(&self.dir, e))?;
        log::info!("Created migrations directory {}", self.dir.display());
        Ok(true)
    }

    /// Path of the file backing migration `id`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{MIGRATION_EXTENSION}"))
    }

    /// All migrations in the directory, sorted ascending by id.
    ///
    /// Fails if the directory is missing or unreadable, or if any file uses
    /// the uninitialized sentinel as its id.
    pub fn list(&self) -> CoreResult<Vec<Migration>> {
        if !self.dir.is_dir() {
            return Err(CoreError::MigrationsDirNotFound {
                path: self.dir.display().to_string(),
            });
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| self.io_error(&self.dir, e))?;

        let mut migrations = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| self.io_error(&self.dir, e))?.path();

            if !path.is_file() {
                log::debug!("Skipping non-file entry {}", path.display());
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(MIGRATION_EXTENSION) {
                log::warn!("Skipping non-migration file {}", path.display());
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                log::warn!("Skipping migration with non UTF-8 name {}", path.display());
                continue;
            };
            if id == UNINITIALIZED_VERSION {
                return Err(CoreError::ReservedMigrationId {
                    path: path.display().to_string(),
                });
            }

            migrations.push(Migration::new(id, &path));
        }

        migrations.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(migrations)
    }

    /// Read the SQL batch of migration `id`.
    ///
    /// Ids that could name a file outside the directory are never read.
    pub fn load(&self, id: &str) -> CoreResult<String> {
        if id.contains('/') || id.contains('\\') || id.contains("..") {
            log::warn!("Refusing to read migration with path-like id '{id}'");
            return Err(CoreError::MigrationNotFound { id: id.to_string() });
        }
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(CoreError::MigrationNotFound { id: id.to_string() });
        }
        fs::read_to_string(&path).map_err(|e| self.io_error(&path, e))
    }

    /// Read the SQL batch of `migration` and pair it with the descriptor.
    pub fn load_script(&self, migration: &Migration) -> CoreResult<MigrationScript> {
        let sql = fs::read_to_string(&migration.path)
            .map_err(|e| self.io_error(&migration.path, e))?;
        Ok(MigrationScript {
            migration: migration.clone(),
            sql,
        })
    }

    /// Persist a new migration and return its id.
    ///
    /// The new id always sorts after the newest existing one. Existing files
    /// are never overwritten.
    pub fn add(
        &self,
        generator: &mut IdGenerator,
        description: &str,
        sql: &str,
        kind: MigrationKind,
    ) -> CoreResult<MigrationId> {
        validate_description(description)?;

        let id = match self.list()?.last() {
            Some(newest) => generator.next_id_after(&newest.id, description, kind)?,
            None => generator.next_id(description, kind)?,
        };
        let path = self.path_for(&id);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| self.io_error(&path, e))?;
        file.write_all(sql.as_bytes())
            .map_err(|e| self.io_error(&path, e))?;

        log::debug!("Added {} migration {}", kind, id);
        Ok(id)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> CoreError {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
