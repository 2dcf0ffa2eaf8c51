//! Error types for rw-runner

use crate::loader::Direction;
use rw_core::CoreError;
use rw_db::DbError;
use thiserror::Error;

/// Runner errors
///
/// Every script-level variant names the script, so a failure report always
/// says which script stopped the run.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Requested operation is not defined by the script (R001)
    #[error("[R001] Script '{id}' does not define a '{direction}' operation")]
    MissingOperation { id: String, direction: Direction },

    /// The script's operation itself failed (R002)
    #[error("[R002] Script '{id}' failed during '{direction}': {message}")]
    ScriptRuntime {
        id: String,
        direction: Direction,
        message: String,
    },

    /// No script with this identifier could be loaded (R003)
    #[error("[R003] Script '{id}' not found in {location}")]
    ScriptNotFound { id: String, location: String },

    /// The ledger already records the script (R004)
    #[error("[R004] Script '{id}' is already recorded in the {table} ledger")]
    DuplicateEntry { id: String, table: String },

    /// Any other store failure (R005)
    #[error("[R005] Ledger operation failed: {0}")]
    Ledger(DbError),

    /// Scanning or configuration failure (R006)
    #[error("[R006] {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;

impl From<DbError> for RunnerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateEntry { table, name } => {
                RunnerError::DuplicateEntry { id: name, table }
            }
            other => RunnerError::Ledger(other),
        }
    }
}

impl RunnerError {
    /// Identifier of the script the error is about, if any
    pub fn script_id(&self) -> Option<&str> {
        match self {
            RunnerError::MissingOperation { id, .. }
            | RunnerError::ScriptRuntime { id, .. }
            | RunnerError::ScriptNotFound { id, .. }
            | RunnerError::DuplicateEntry { id, .. } => Some(id),
            RunnerError::Ledger(_) | RunnerError::Core(_) => None,
        }
    }
}
