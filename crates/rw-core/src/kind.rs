//! Kinds of versioned scripts.

use serde::{Deserialize, Serialize};

/// Which family of scripts a runner manages.
///
/// Migrations and seeds share every rule; they differ only in the ledger
/// table, the default directory, and how they are named in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    /// Schema migration
    Migration,
    /// Data seed
    Seed,
}

impl ScriptKind {
    /// Name of the ledger table recording executed scripts of this kind.
    pub fn ledger_table(&self) -> &'static str {
        match self {
            ScriptKind::Migration => "migrations",
            ScriptKind::Seed => "seeders",
        }
    }

    /// Directory used when the config does not override it.
    pub fn default_dir(&self) -> &'static str {
        match self {
            ScriptKind::Migration => "migrations",
            ScriptKind::Seed => "seeders",
        }
    }

    /// Singular noun for user-facing output.
    pub fn noun(&self) -> &'static str {
        match self {
            ScriptKind::Migration => "migration",
            ScriptKind::Seed => "seed",
        }
    }

    /// Plural noun for user-facing output.
    pub fn plural(&self) -> &'static str {
        match self {
            ScriptKind::Migration => "migrations",
            ScriptKind::Seed => "seeds",
        }
    }
}

impl std::fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}
