//! Script loading: resolves an identifier to its forward and reverse
//! operations.
//!
//! Loading is a trust boundary. Whatever a loader returns runs with full
//! access to the store; scripts are assumed to come from the project itself.

use crate::error::{RunnerError, RunnerResult};
use rw_core::{ScriptId, ScriptKind};
use rw_db::{DbResult, Store};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Result returned by a script operation
pub type OperationResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Which of a script's two operations to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Forward operation (apply)
    Up,
    /// Reverse operation (undo)
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// What an operation gets to work with
pub struct ScriptContext<'a> {
    store: &'a Store,
    id: &'a ScriptId,
    kind: ScriptKind,
}

impl<'a> ScriptContext<'a> {
    pub(crate) fn new(store: &'a Store, id: &'a ScriptId, kind: ScriptKind) -> Self {
        Self { store, id, kind }
    }

    /// The store the script runs against
    pub fn store(&self) -> &Store {
        self.store
    }

    /// Raw DuckDB connection, for scripts that need prepared statements
    pub fn conn(&self) -> &duckdb::Connection {
        self.store.conn()
    }

    /// Execute one or more SQL statements
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.store.execute_batch(sql)
    }

    /// Identifier of the running script
    pub fn id(&self) -> &ScriptId {
        self.id
    }

    /// Whether the script is a migration or a seed
    pub fn kind(&self) -> ScriptKind {
        self.kind
    }
}

/// One direction of a script
pub trait Operation: Send + Sync {
    /// Run the operation against the store
    fn run(&self, ctx: &ScriptContext<'_>) -> OperationResult;
}

/// Adapts a closure into an [`Operation`]
struct FnOperation<F>(F);

impl<F> Operation for FnOperation<F>
where
    F: Fn(&ScriptContext<'_>) -> OperationResult + Send + Sync,
{
    fn run(&self, ctx: &ScriptContext<'_>) -> OperationResult {
        (self.0)(ctx)
    }
}

/// A loaded script: its identifier and whichever operations it defines
#[derive(Clone)]
pub struct ScriptUnit {
    /// Script identifier
    pub id: ScriptId,
    up: Option<Arc<dyn Operation>>,
    down: Option<Arc<dyn Operation>>,
}

impl ScriptUnit {
    /// Build a unit from its operations
    pub fn new(
        id: ScriptId,
        up: Option<Arc<dyn Operation>>,
        down: Option<Arc<dyn Operation>>,
    ) -> Self {
        Self { id, up, down }
    }

    /// Whether the script defines the operation for `direction`
    pub fn has(&self, direction: Direction) -> bool {
        self.slot(direction).is_some()
    }

    /// The operation for `direction`, or [`RunnerError::MissingOperation`]
    pub fn operation(&self, direction: Direction) -> RunnerResult<&dyn Operation> {
        self.slot(direction)
            .map(|op| op.as_ref())
            .ok_or_else(|| RunnerError::MissingOperation {
                id: self.id.to_string(),
                direction,
            })
    }

    fn slot(&self, direction: Direction) -> Option<&Arc<dyn Operation>> {
        match direction {
            Direction::Up => self.up.as_ref(),
            Direction::Down => self.down.as_ref(),
        }
    }
}

impl std::fmt::Debug for ScriptUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptUnit")
            .field("id", &self.id)
            .field("up", &self.up.is_some())
            .field("down", &self.down.is_some())
            .finish()
    }
}

/// Resolves script identifiers to [`ScriptUnit`]s
pub trait ScriptLoader {
    /// Load the script `id` from the script directory `dir`
    fn load(&self, dir: &Path, id: &ScriptId) -> RunnerResult<ScriptUnit>;
}

/// In-process loader: scripts are Rust closures registered by identifier.
///
/// The directory is still scanned to decide what is pending, so every
/// registered script needs a matching file (its contents are ignored).
#[derive(Default, Clone)]
pub struct ScriptRegistry {
    scripts: HashMap<String, ScriptUnit>,
}

impl ScriptRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script with only a forward operation
    pub fn register<U>(&mut self, id: &str, up: U) -> &mut Self
    where
        U: Fn(&ScriptContext<'_>) -> OperationResult + Send + Sync + 'static,
    {
        self.insert(id, Some(Arc::new(FnOperation(up))), None)
    }

    /// Register a script with forward and reverse operations
    pub fn register_reversible<U, D>(&mut self, id: &str, up: U, down: D) -> &mut Self
    where
        U: Fn(&ScriptContext<'_>) -> OperationResult + Send + Sync + 'static,
        D: Fn(&ScriptContext<'_>) -> OperationResult + Send + Sync + 'static,
    {
        self.insert(
            id,
            Some(Arc::new(FnOperation(up))),
            Some(Arc::new(FnOperation(down))),
        )
    }

    /// Identifiers currently registered, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.scripts.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    fn insert(
        &mut self,
        id: &str,
        up: Option<Arc<dyn Operation>>,
        down: Option<Arc<dyn Operation>>,
    ) -> &mut Self {
        match ScriptId::try_new(id) {
            Some(script_id) => {
                self.scripts
                    .insert(id.to_string(), ScriptUnit::new(script_id, up, down));
            }
            None => log::warn!("Ignoring script registered with an empty identifier"),
        }
        self
    }
}

impl ScriptLoader for ScriptRegistry {
    fn load(&self, _dir: &Path, id: &ScriptId) -> RunnerResult<ScriptUnit> {
        self.scripts
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| RunnerError::ScriptNotFound {
                id: id.to_string(),
                location: "script registry".to_string(),
            })
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
