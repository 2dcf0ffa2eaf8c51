//! Apply and undo execution over one script directory and its ledger.
//!
//! A [`Runner`] owns the store for its whole lifetime. Every sequence
//! (`apply_all`, `undo_all`) is fail-fast: the first failing script stops the
//! run, everything before it stays recorded and nothing after it is touched.

use crate::error::{RunnerError, RunnerResult};
use crate::loader::{Direction, Operation, ScriptContext, ScriptLoader};
use crate::sql_file::SqlFileLoader;
use rw_core::{scan_scripts, ExecutionState, ScriptId, ScriptKind, ScriptStatus};
use rw_db::{Ledger, LedgerEntry, Store};
use std::path::{Path, PathBuf};

/// How a script's operation and its ledger write are grouped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Operation and ledger write are separate store calls. A crash between
    /// them leaves the effect applied but unrecorded (or reversed but still
    /// recorded).
    #[default]
    Independent,

    /// Operation and ledger write share one transaction, rolled back if
    /// either fails.
    Transactional,
}

/// Progress notification emitted while a sequence runs
#[derive(Debug)]
pub enum RunEvent<'e> {
    /// About to run the script's operation
    Started {
        id: &'e ScriptId,
        direction: Direction,
    },

    /// Operation finished and the ledger was updated
    Completed {
        id: &'e ScriptId,
        direction: Direction,
    },

    /// Operation or ledger update failed; the sequence stops here
    Failed {
        id: &'e ScriptId,
        direction: Direction,
        error: &'e RunnerError,
    },
}

/// Runner bound to a store, a script kind and a script directory
pub struct Runner<L: ScriptLoader = SqlFileLoader> {
    store: Store,
    kind: ScriptKind,
    dir: PathBuf,
    loader: L,
    mode: ExecutionMode,
}

impl Runner<SqlFileLoader> {
    /// Create a runner that reads `.sql` scripts from `dir`, creating the
    /// ledger table if needed
    pub fn initialize(
        store: Store,
        kind: ScriptKind,
        dir: impl Into<PathBuf>,
    ) -> RunnerResult<Self> {
        Self::with_loader(store, kind, dir, SqlFileLoader)
    }
}

impl<L: ScriptLoader> Runner<L> {
    /// Create a runner with a custom loader, creating the ledger table if
    /// needed
    pub fn with_loader(
        store: Store,
        kind: ScriptKind,
        dir: impl Into<PathBuf>,
        loader: L,
    ) -> RunnerResult<Self> {
        let runner = Self {
            store,
            kind,
            dir: dir.into(),
            loader,
            mode: ExecutionMode::default(),
        };
        runner.ledger().ensure_schema()?;
        log::debug!(
            "Initialized {} runner over {}",
            runner.kind,
            runner.dir.display()
        );
        Ok(runner)
    }

    /// Switch the execution mode
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Current execution mode
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Kind of scripts this runner manages
    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    /// Script directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The store scripts run against
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn ledger(&self) -> Ledger<'_> {
        Ledger::new(&self.store, self.kind.ledger_table())
    }

    /// Scripts found in the directory, ascending
    pub fn scripts(&self) -> RunnerResult<Vec<ScriptId>> {
        Ok(scan_scripts(&self.dir)?)
    }

    /// Scripts recorded in the ledger, ascending
    pub fn executed(&self) -> RunnerResult<Vec<ScriptId>> {
        Ok(self.ledger().list_executed()?)
    }

    /// Scanned scripts reconciled against the ledger
    pub fn state(&self) -> RunnerResult<ExecutionState> {
        let scanned = self.scripts()?;
        let executed = self.executed()?;
        Ok(ExecutionState::compute(&scanned, &executed))
    }

    /// Scanned scripts not yet recorded, ascending
    pub fn pending(&self) -> RunnerResult<Vec<ScriptId>> {
        Ok(self.state()?.pending)
    }

    /// Every scanned script with its executed flag
    pub fn status(&self) -> RunnerResult<Vec<ScriptStatus>> {
        Ok(self.state()?.status)
    }

    /// Raw ledger rows with their timestamps
    pub fn ledger_entries(&self) -> RunnerResult<Vec<LedgerEntry>> {
        Ok(self.ledger().entries()?)
    }

    /// Run one script's forward operation and record it.
    ///
    /// Does not consult the pending set: applying a recorded script runs its
    /// operation again and then fails with [`RunnerError::DuplicateEntry`].
    pub fn apply(&self, id: &ScriptId) -> RunnerResult<()> {
        self.execute(id, Direction::Up)
    }

    /// Run one script's reverse operation and remove its ledger entry
    pub fn revert(&self, id: &ScriptId) -> RunnerResult<()> {
        self.execute(id, Direction::Down)
    }

    /// Apply every pending script in ascending order.
    ///
    /// Returns the identifiers applied. On failure the failing script is not
    /// recorded and later scripts stay pending.
    pub fn apply_all<F>(&self, mut observer: F) -> RunnerResult<Vec<ScriptId>>
    where
        F: FnMut(RunEvent<'_>),
    {
        let pending = self.pending()?;
        log::debug!("{} pending {}", pending.len(), self.kind.plural());
        self.run_sequence(&pending, Direction::Up, &mut observer)?;
        Ok(pending)
    }

    /// Undo the greatest executed identifier.
    ///
    /// Returns `None` when nothing is recorded. A script with no reverse
    /// operation fails with [`RunnerError::MissingOperation`] and stays
    /// recorded.
    pub fn undo_last<F>(&self, mut observer: F) -> RunnerResult<Option<ScriptId>>
    where
        F: FnMut(RunEvent<'_>),
    {
        let executed = self.executed()?;
        let Some(last) = executed.into_iter().max() else {
            return Ok(None);
        };
        self.run_sequence(std::slice::from_ref(&last), Direction::Down, &mut observer)?;
        Ok(Some(last))
    }

    /// Undo every executed script in descending order.
    ///
    /// Returns the identifiers undone. On failure the failing script and
    /// every script before it (in ascending order) stay recorded.
    pub fn undo_all<F>(&self, mut observer: F) -> RunnerResult<Vec<ScriptId>>
    where
        F: FnMut(RunEvent<'_>),
    {
        let mut executed = self.executed()?;
        executed.sort_unstable_by(|a, b| b.cmp(a));
        self.run_sequence(&executed, Direction::Down, &mut observer)?;
        Ok(executed)
    }

    /// Release the store
    pub fn close(self) -> RunnerResult<()> {
        Ok(self.store.close()?)
    }

    fn run_sequence(
        &self,
        ids: &[ScriptId],
        direction: Direction,
        observer: &mut dyn FnMut(RunEvent<'_>),
    ) -> RunnerResult<()> {
        for id in ids {
            observer(RunEvent::Started { id, direction });
            if let Err(error) = self.execute(id, direction) {
                log::debug!("{id} failed during {direction}: {error}");
                observer(RunEvent::Failed {
                    id,
                    direction,
                    error: &error,
                });
                return Err(error);
            }
            observer(RunEvent::Completed { id, direction });
        }
        Ok(())
    }

    fn execute(&self, id: &ScriptId, direction: Direction) -> RunnerResult<()> {
        let unit = self.loader.load(&self.dir, id)?;
        let operation = unit.operation(direction)?;

        match self.mode {
            ExecutionMode::Independent => {
                self.run_and_record(&self.store, operation, id, direction)
            }
            ExecutionMode::Transactional => self
                .store
                .transaction(|store| self.run_and_record(store, operation, id, direction)),
        }
    }

    fn run_and_record(
        &self,
        store: &Store,
        operation: &dyn Operation,
        id: &ScriptId,
        direction: Direction,
    ) -> RunnerResult<()> {
        log::debug!("Running {direction} for {id}");
        let ctx = ScriptContext::new(store, id, self.kind);
        operation
            .run(&ctx)
            .map_err(|e| RunnerError::ScriptRuntime {
                id: id.to_string(),
                direction,
                message: e.to_string(),
            })?;

        let ledger = Ledger::new(store, self.kind.ledger_table());
        match direction {
            Direction::Up => ledger.record_executed(id)?,
            Direction::Down => ledger.record_reverted(id)?,
        }
        log::debug!("Recorded {direction} for {id} in {}", ledger.table());
        Ok(())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
