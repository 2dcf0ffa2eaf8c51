//! Store handle: a single DuckDB connection owned by one runner.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use std::path::Path;

const MEMORY_PATH: &str = ":memory:";

/// Wrapper around the DuckDB connection scripts run against.
///
/// Single-threaded: scripts and ledger writes are issued sequentially by the
/// runner that owns the store. Dropping the store releases the connection,
/// so error paths never leak it.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open an in-memory store
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open (or create) a store backed by the file at `path`
    pub fn open_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Open from a path string (handles the `:memory:` special case)
    pub fn open(path: &str) -> DbResult<Self> {
        if path == MEMORY_PATH {
            Self::open_memory()
        } else {
            Self::open_path(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute one or more SQL statements
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Check whether a table or view exists
    ///
    /// Unqualified names are looked up in the `main` schema.
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (schema, table),
            None => ("main", name),
        };

        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Store) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(self);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    ))
                    .into());
                }
            }
            Err(_) => {
                if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("ROLLBACK failed: {e}");
                }
            }
        }
        result
    }

    /// Release the connection, reporting any error from closing it.
    pub fn close(self) -> DbResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| DbError::ConnectionError(format!("close failed: {e}")))
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
