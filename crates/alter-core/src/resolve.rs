//! Version resolution: which migrations does a database still need?
//!
//! A single pass over the available migrations in id order. Incrementals are
//! held back in a pending run until we know whether a later differential
//! replaces them. A differential replaces the pending run unless the
//! database already sits inside that run, in which case the run is kept and
//! the differential is dropped. A baseline only counts for an uninitialized
//! database and then discards everything before it.

use crate::migration::{DatabaseVersion, Migration, MigrationKind};

/// Compute the ordered migrations needed to bring a database at `current`
/// up to `target` (or to the newest migration when `target` is `None` or
/// empty).
///
/// `available` must be sorted ascending by id. The result preserves that
/// order and only contains ids strictly greater than `current`.
pub fn resolve(
    available: &[Migration],
    current: &DatabaseVersion,
    target: Option<&str>,
) -> Vec<Migration> {
    let target = target.filter(|t| !t.is_empty());
    let current_id = current.as_str();

    let mut needed: Vec<Migration> = Vec::new();
    let mut pending: Vec<Migration> = Vec::new();

    let bounded = available
        .iter()
        .filter(|m| target.map_or(true, |t| m.id.as_str() <= t));

    for migration in bounded {
        match migration.kind {
            MigrationKind::Differential => {
                let inside_pending_run = !current.is_differential()
                    && pending.iter().any(|m| m.id == current_id)
                    && pending.iter().any(|m| m.id.as_str() >= current_id);

                if inside_pending_run {
                    log::debug!(
                        "Skipping differential {}: database is at {} inside the run it replaces",
                        migration.id,
                        current
                    );
                    needed.append(&mut pending);
                } else {
                    log::debug!(
                        "Differential {} replaces {} pending incremental(s)",
                        migration.id,
                        pending.len()
                    );
                    pending.clear();
                    needed.push(migration.clone());
                }
            }
            MigrationKind::Baseline => {
                if current.is_uninitialized() {
                    log::debug!("Baseline {} resets the plan", migration.id);
                    needed.clear();
                    pending.clear();
                    needed.push(migration.clone());
                } else {
                    log::debug!(
                        "Skipping baseline {}: database already at {}",
                        migration.id,
                        current
                    );
                }
            }
            MigrationKind::Incremental => pending.push(migration.clone()),
        }
    }

    needed.append(&mut pending);
    needed.retain(|m| m.id.as_str() > current_id);
    needed
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
