//! Undo command implementation - reverses the last or every executed script

use anyhow::{Context, Result};
use rw_core::ScriptKind;

use crate::cli::{GlobalArgs, UndoArgs};
use crate::commands::common::{execution_mode, print_event, ProjectContext};

/// Execute `migration undo` / `seed undo`
pub(crate) fn execute(args: &UndoArgs, kind: ScriptKind, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let runner = ctx.runner(kind, execution_mode(args.transactional))?;

    if args.all {
        println!("Undoing all {}...", kind.plural());
        println!();

        let undone = runner
            .undo_all(print_event)
            .with_context(|| format!("Failed to undo {}", kind.plural()))?;
        if undone.is_empty() {
            println!("No {} to undo.", kind.plural());
        } else {
            println!();
            println!("✓ Undid {} {}(s)", undone.len(), kind.noun());
        }
    } else {
        println!("Undoing last {}...", kind.noun());
        println!();

        let undone = runner
            .undo_last(print_event)
            .with_context(|| format!("Failed to undo the last {}", kind.noun()))?;
        if undone.is_none() {
            println!("No {} to undo.", kind.plural());
        }
    }

    runner.close()?;
    Ok(())
}
