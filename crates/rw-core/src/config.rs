//! Configuration types and parsing for rewind.yml

use crate::error::{CoreError, CoreResult};
use crate::kind::ScriptKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file names looked up in a project directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["rewind.yml", "rewind.yaml"];

/// Environment variable consulted when no `--env` flag is given.
pub const ENV_VAR: &str = "REWIND_ENV";

const MEMORY_DB_PATH: &str = ":memory:";

/// Main project configuration from rewind.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory holding migration scripts, relative to the project root
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Directory holding seed scripts, relative to the project root
    #[serde(default = "default_seeders_path")]
    pub seeders_path: String,

    /// Base store configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named environments (e.g. development, test, production)
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

/// Environment-specific overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Store configuration for this environment; falls back to the base one
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Store connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether this configuration points at a throwaway in-memory store
    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_DB_PATH
    }

    /// Store path with relative file paths resolved against `root`
    pub fn resolved_path(&self, root: &Path) -> String {
        if self.is_memory() || Path::new(&self.path).is_absolute() {
            self.path.clone()
        } else {
            root.join(&self.path).display().to_string()
        }
    }
}

fn default_migrations_path() -> String {
    ScriptKind::Migration.default_dir().to_string()
}

fn default_seeders_path() -> String {
    ScriptKind::Seed.default_dir().to_string()
}

fn default_db_path() -> String {
    MEMORY_DB_PATH.to_string()
}

impl Config {
    /// Configuration written by `rw init` for a new project
    pub fn scaffold(name: &str) -> Self {
        Self {
            name: name.to_string(),
            migrations_path: default_migrations_path(),
            seeders_path: default_seeders_path(),
            database: DatabaseConfig::default(),
            environments: BTreeMap::new(),
        }
    }

    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for rewind.yml or rewind.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            }),
        }
    }

    /// Path of the config file in `dir`, if any
    pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
    }

    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        if self.migrations_path.is_empty() || self.seeders_path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_path and seeders_path must not be empty".to_string(),
            });
        }
        if self.migrations_path == self.seeders_path {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "migrations_path and seeders_path must differ (both are '{}')",
                    self.migrations_path
                ),
            });
        }
        Ok(())
    }

    /// Absolute directory for scripts of `kind`
    pub fn scripts_path(&self, kind: ScriptKind, root: &Path) -> PathBuf {
        match kind {
            ScriptKind::Migration => root.join(&self.migrations_path),
            ScriptKind::Seed => root.join(&self.seeders_path),
        }
    }

    /// Names of the configured environments, sorted
    pub fn available_environments(&self) -> Vec<&str> {
        self.environments.keys().map(|s| s.as_str()).collect()
    }

    /// Store configuration for `environment`, or the base one when `None`.
    ///
    /// A named environment that does not exist is an error rather than a
    /// silent fallback, so a typo never points a run at the wrong store.
    pub fn database_for(&self, environment: Option<&str>) -> CoreResult<DatabaseConfig> {
        match environment {
            Some(name) => {
                let env = self
                    .environments
                    .get(name)
                    .ok_or_else(|| CoreError::EnvironmentNotFound {
                        name: name.to_string(),
                        available: if self.environments.is_empty() {
                            "(none)".to_string()
                        } else {
                            self.available_environments().join(", ")
                        },
                    })?;
                Ok(env
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Resolve the environment from the CLI flag or `REWIND_ENV`
    ///
    /// Priority: CLI flag > REWIND_ENV env var > None
    pub fn resolve_environment(cli_env: Option<&str>) -> Option<String> {
        cli_env
            .map(String::from)
            .or_else(|| std::env::var(ENV_VAR).ok())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
