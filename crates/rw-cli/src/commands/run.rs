//! Run command implementation - applies every pending script

use anyhow::{Context, Result};
use rw_core::ScriptKind;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{execution_mode, print_event, ProjectContext};

/// Execute `migration run` / `seed run`
pub(crate) fn execute(args: &RunArgs, kind: ScriptKind, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let runner = ctx.runner(kind, execution_mode(args.transactional))?;

    println!("Running {}...", kind.plural());
    println!();

    let pending = runner.pending()?;
    if pending.is_empty() {
        println!("No pending {}.", kind.plural());
        runner.close()?;
        return Ok(());
    }

    println!("Found {} pending {}(s):", pending.len(), kind.noun());
    for id in &pending {
        println!("  - {id}");
    }
    println!();

    let applied = runner
        .apply_all(print_event)
        .with_context(|| format!("Failed to run {}", kind.plural()))?;

    if global.verbose {
        eprintln!("[verbose] Applied {} {}(s)", applied.len(), kind.noun());
    }

    println!();
    println!("✓ All {} completed successfully!", kind.plural());
    runner.close()?;
    Ok(())
}
