//! Add command implementation - writes a new migration file

use alter_core::IdGenerator;
use anyhow::{Context, Result};

use crate::cli::{AddArgs, GlobalArgs};
use crate::context::ProjectContext;

/// Execute the add command
pub(crate) async fn execute(args: &AddArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let store = ctx.store();
    let kind = args.kind();

    let mut generator = IdGenerator::new();
    let id = store
        .add(&mut generator, &args.description, &args.sql, kind)
        .with_context(|| format!("Failed to add {kind} migration"))?;

    println!("{}", store.path_for(&id).display());
    Ok(())
}
