//! Status command implementation - lists executed and pending scripts

use anyhow::{Context, Result};
use rw_core::{ExecutionState, ScriptKind};
use rw_db::LedgerEntry;
use serde::Serialize;
use std::collections::HashMap;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{title, ProjectContext};

/// One line of JSON status output
#[derive(Debug, Serialize)]
struct StatusRow<'a> {
    name: &'a str,
    executed: bool,
    executed_at: Option<&'a str>,
}

/// JSON status document
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    kind: ScriptKind,
    scripts: Vec<StatusRow<'a>>,
    orphaned: Vec<&'a str>,
    executed: usize,
    pending: usize,
}

/// Execute `migration status` / `seed status`
pub(crate) fn execute(args: &StatusArgs, kind: ScriptKind, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let runner = ctx.runner(kind, Default::default())?;

    let state = runner.state()?;
    let entries = runner.ledger_entries()?;

    for orphan in state.orphaned() {
        log::warn!(
            "{} is recorded in the {} ledger but has no script file",
            orphan,
            kind.ledger_table()
        );
    }

    match args.output {
        StatusOutput::Table => print_table(kind, &state),
        StatusOutput::Json => print_json(kind, &state, &entries)?,
    }

    runner.close()?;
    Ok(())
}

fn print_table(kind: ScriptKind, state: &ExecutionState) {
    if state.is_empty() {
        println!("No {} found.", kind.plural());
        return;
    }

    println!("{} Status:", title(kind));
    println!();
    for script in &state.status {
        let (icon, label) = if script.executed {
            ("✓", "executed")
        } else {
            ("○", "pending")
        };
        println!("  {icon} {} {label}", script.name);
    }
    println!();
    println!(
        "Summary: {} executed, {} pending",
        state.executed_count(),
        state.pending_count()
    );
}

fn print_json(kind: ScriptKind, state: &ExecutionState, entries: &[LedgerEntry]) -> Result<()> {
    let executed_at: HashMap<&str, &str> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.executed_at.as_str()))
        .collect();

    let report = StatusReport {
        kind,
        scripts: state
            .status
            .iter()
            .map(|s| StatusRow {
                name: s.name.as_str(),
                executed: s.executed,
                executed_at: executed_at.get(s.name.as_str()).copied(),
            })
            .collect(),
        orphaned: state.orphaned().into_iter().map(|id| id.as_str()).collect(),
        executed: state.executed_count(),
        pending: state.pending_count(),
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize status")?;
    println!("{json}");
    Ok(())
}
