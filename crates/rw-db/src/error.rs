//! Error types for rw-db

use thiserror::Error;

/// Store operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Ledger already records this script (D003)
    #[error("[D003] '{name}' is already recorded in the {table} ledger")]
    DuplicateEntry { table: String, name: String },

    /// Transaction management error (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

/// Whether a DuckDB error is a unique/primary key violation.
///
/// duckdb::Error does not expose structured constraint variants, so the
/// message is the only signal. Both the current and the older wording are
/// matched.
pub(crate) fn is_unique_violation(err: &duckdb::Error) -> bool {
    let msg = err.to_string();
    msg.contains("Constraint Error")
        && (msg.contains("Duplicate key")
            || msg.contains("duplicate key")
            || msg.contains("unique constraint")
            || msg.contains("UNIQUE constraint"))
}
