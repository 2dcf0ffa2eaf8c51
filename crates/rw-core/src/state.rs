//! Execution state: reconciles scanned scripts against the ledger.
//!
//! The scanner and the ledger are observed independently. This is the only
//! place where the two are combined; nothing else assumes one implies the
//! other.

use crate::script_id::ScriptId;
use serde::Serialize;
use std::collections::HashSet;

/// One scanned script tagged with whether the ledger records it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptStatus {
    /// Script identifier
    pub name: ScriptId,

    /// Whether the ledger has an entry for it
    pub executed: bool,
}

/// Derived view of scanned scripts versus ledger contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionState {
    /// Scanned but not recorded, in scanned order
    pub pending: Vec<ScriptId>,

    /// Recorded in the ledger, ascending by name
    pub executed: Vec<ScriptId>,

    /// Every scanned script with its executed flag
    pub status: Vec<ScriptStatus>,
}

impl ExecutionState {
    /// Compute the state from the scanner output and the ledger names.
    ///
    /// Both inputs are expected ascending; the output preserves that order.
    pub fn compute(scanned: &[ScriptId], executed: &[ScriptId]) -> Self {
        let recorded: HashSet<&str> = executed.iter().map(|id| id.as_str()).collect();

        let status: Vec<ScriptStatus> = scanned
            .iter()
            .map(|id| ScriptStatus {
                name: id.clone(),
                executed: recorded.contains(id.as_str()),
            })
            .collect();

        let pending = status
            .iter()
            .filter(|s| !s.executed)
            .map(|s| s.name.clone())
            .collect();

        Self {
            pending,
            executed: executed.to_vec(),
            status,
        }
    }

    /// True when no scripts were scanned
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    /// Number of scanned scripts recorded as executed
    pub fn executed_count(&self) -> usize {
        self.status.iter().filter(|s| s.executed).count()
    }

    /// Number of scanned scripts still pending
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Ledger entries whose script file is no longer on disk.
    pub fn orphaned(&self) -> Vec<&ScriptId> {
        let scanned: HashSet<&str> = self.status.iter().map(|s| s.name.as_str()).collect();
        self.executed
            .iter()
            .filter(|id| !scanned.contains(id.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
