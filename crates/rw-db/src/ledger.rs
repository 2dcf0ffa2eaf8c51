//! Execution ledger: the durable record of which scripts have run.
//!
//! One table per script kind (`migrations`, `seeders`) with a row per
//! executed script. Every operation here is a single statement; callers that
//! want the script's effect and its ledger row to land together must wrap
//! both in [`Store::transaction`].

use crate::error::{is_unique_violation, DbError, DbResult};
use crate::store::Store;
use rw_core::ScriptId;

/// One executed script as recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Script identifier
    pub name: ScriptId,

    /// When the forward operation was recorded, as rendered by the store
    pub executed_at: String,
}

/// Ledger table bound to a store
pub struct Ledger<'a> {
    store: &'a Store,
    table: &'a str,
}

impl<'a> Ledger<'a> {
    /// Bind the ledger `table` on `store`.
    ///
    /// `table` is interpolated into SQL and must be a trusted identifier.
    pub fn new(store: &'a Store, table: &'a str) -> Self {
        debug_assert!(
            table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
            "ledger table must be a plain identifier"
        );
        Self { store, table }
    }

    /// Table name this ledger writes to
    pub fn table(&self) -> &str {
        self.table
    }

    /// Create the ledger table if it is absent. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> DbResult<()> {
        if self.store.relation_exists(self.table)? {
            return Ok(());
        }

        log::debug!("Creating ledger table '{}'", self.table);
        self.store
            .execute_batch(&format!(
                "CREATE SEQUENCE IF NOT EXISTS {table}_id_seq;
                 CREATE TABLE IF NOT EXISTS {table} (
                     id          INTEGER PRIMARY KEY DEFAULT nextval('{table}_id_seq'),
                     name        VARCHAR NOT NULL UNIQUE,
                     executed_at TIMESTAMP NOT NULL DEFAULT current_timestamp
                 );",
                table = self.table
            ))
            .map_err(|e| {
                DbError::ExecutionError(format!(
                    "failed to create ledger table {}: {e}",
                    self.table
                ))
            })
    }

    /// Record `id` as executed.
    ///
    /// Fails with [`DbError::DuplicateEntry`] if it is already recorded; no
    /// second row is written.
    pub fn record_executed(&self, id: &ScriptId) -> DbResult<()> {
        self.store
            .conn()
            .execute(
                &format!("INSERT INTO {} (name) VALUES (?)", self.table),
                duckdb::params![id.as_str()],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::DuplicateEntry {
                        table: self.table.to_string(),
                        name: id.to_string(),
                    }
                } else {
                    DbError::ExecutionError(format!("failed to record {id}: {e}"))
                }
            })?;
        Ok(())
    }

    /// Remove the entry for `id`. Removing an absent entry is not an error.
    pub fn record_reverted(&self, id: &ScriptId) -> DbResult<()> {
        let removed = self
            .store
            .conn()
            .execute(
                &format!("DELETE FROM {} WHERE name = ?", self.table),
                duckdb::params![id.as_str()],
            )
            .map_err(|e| DbError::ExecutionError(format!("failed to unrecord {id}: {e}")))?;
        if removed == 0 {
            log::debug!("No {} entry to remove for {}", self.table, id);
        }
        Ok(())
    }

    /// Executed identifiers, ascending by name
    pub fn list_executed(&self) -> DbResult<Vec<ScriptId>> {
        Ok(self.entries()?.into_iter().map(|e| e.name).collect())
    }

    /// Executed entries with their timestamps, ascending by name
    pub fn entries(&self) -> DbResult<Vec<LedgerEntry>> {
        let mut stmt = self.store.conn().prepare(&format!(
            "SELECT name, CAST(executed_at AS VARCHAR) FROM {} ORDER BY name ASC",
            self.table
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (name, executed_at) = row?;
            match ScriptId::try_new(name) {
                Some(name) => entries.push(LedgerEntry { name, executed_at }),
                None => log::warn!("Ignoring {} row with an empty name", self.table),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
