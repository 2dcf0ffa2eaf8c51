//! rw-runner - Versioned script execution for Rewind
//!
//! This crate resolves script identifiers to their forward and reverse
//! operations and runs them against a store, keeping the execution ledger in
//! step with what actually completed.

pub mod error;
pub mod loader;
pub mod runner;
pub mod sql_file;

pub use error::{RunnerError, RunnerResult};
pub use loader::{
    Direction, Operation, OperationResult, ScriptContext, ScriptLoader, ScriptRegistry, ScriptUnit,
};
pub use runner::{ExecutionMode, RunEvent, Runner};
pub use sql_file::{parse_sections, SqlFileLoader, SqlOperation, SqlSections};
