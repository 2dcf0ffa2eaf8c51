//! rw-db - Store layer for Rewind
//!
//! This crate provides the DuckDB-backed [`Store`] handle that scripts run
//! against and the [`Ledger`] recording which scripts have executed.

pub mod error;
pub mod ledger;
pub mod store;

pub use error::{DbError, DbResult};
pub use ledger::{Ledger, LedgerEntry};
pub use store::Store;
