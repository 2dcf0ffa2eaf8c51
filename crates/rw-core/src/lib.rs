//! rw-core - Core library for Rewind
//!
//! This crate provides the shared types used across all Rewind components:
//! project configuration, script identifiers, script directory scanning, and
//! the reconciliation of scanned scripts against the execution ledger.

pub mod config;
pub mod error;
pub mod kind;
mod newtype_string;
pub mod scanner;
pub mod script_id;
pub mod state;

pub use config::{Config, DatabaseConfig, EnvironmentConfig};
pub use error::{CoreError, CoreResult};
pub use kind::ScriptKind;
pub use scanner::scan_scripts;
pub use script_id::ScriptId;
pub use state::{ExecutionState, ScriptStatus};
