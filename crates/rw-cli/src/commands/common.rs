//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use rw_core::{Config, ScriptKind};
use rw_db::Store;
use rw_runner::{Direction, ExecutionMode, RunEvent, Runner};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Loaded project: its root, configuration and selected environment.
pub(crate) struct ProjectContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
    pub(crate) environment: Option<String>,
}

impl ProjectContext {
    /// Load `rewind.yml` from the project directory and resolve the
    /// environment (`--env`, then `REWIND_ENV`).
    pub(crate) fn load(global: &GlobalArgs) -> Result<Self> {
        let root = Path::new(&global.project_dir).to_path_buf();
        let config = Config::load_from_dir(&root).context("Failed to load project config")?;
        let environment = Config::resolve_environment(global.env.as_deref());

        if global.verbose {
            eprintln!(
                "[verbose] Project '{}' at {} (environment: {})",
                config.name,
                root.display(),
                environment.as_deref().unwrap_or("base")
            );
        }

        Ok(Self {
            root,
            config,
            environment,
        })
    }

    /// Absolute directory holding scripts of `kind`
    pub(crate) fn scripts_dir(&self, kind: ScriptKind) -> PathBuf {
        self.config.scripts_path(kind, &self.root)
    }

    /// Open the store configured for the selected environment
    pub(crate) fn open_store(&self) -> Result<Store> {
        let database = self.config.database_for(self.environment.as_deref())?;
        if database.is_memory() {
            log::warn!("Using an in-memory database; the ledger will not outlive this command");
        }
        let path = database.resolved_path(&self.root);
        log::debug!("Opening database at {path}");
        Store::open(&path).with_context(|| format!("Failed to connect to database: {path}"))
    }

    /// Open the store and bind a runner for `kind`
    pub(crate) fn runner(&self, kind: ScriptKind, mode: ExecutionMode) -> Result<Runner> {
        let store = self.open_store()?;
        let runner = Runner::initialize(store, kind, self.scripts_dir(kind))
            .with_context(|| format!("Failed to initialize the {} ledger", kind.ledger_table()))?;
        Ok(runner.with_mode(mode))
    }
}

/// Map the `--transactional` flag to an execution mode
pub(crate) fn execution_mode(transactional: bool) -> ExecutionMode {
    if transactional {
        ExecutionMode::Transactional
    } else {
        ExecutionMode::Independent
    }
}

/// Print one progress line per runner event
pub(crate) fn print_event(event: RunEvent<'_>) {
    match event {
        RunEvent::Started { id, direction } => match direction {
            Direction::Up => println!("Running: {id}"),
            Direction::Down => println!("Undoing: {id}"),
        },
        RunEvent::Completed { id, direction } => match direction {
            Direction::Up => println!("✓ Completed: {id}"),
            Direction::Down => println!("✓ Successfully undone: {id}"),
        },
        RunEvent::Failed { id, direction, .. } => match direction {
            Direction::Up => println!("✗ Failed: {id}"),
            Direction::Down => println!("✗ Failed to undo: {id}"),
        },
    }
}

/// Capitalized singular noun for headings ("Migration", "Seed")
pub(crate) fn title(kind: ScriptKind) -> String {
    let noun = kind.noun();
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
