//! Init command implementation - scaffolds a Rewind project in place

use anyhow::{Context, Result};
use rw_core::config::CONFIG_FILE_NAMES;
use rw_core::{Config, DatabaseConfig, EnvironmentConfig, ScriptKind};
use std::fs;
use std::path::Path;

use crate::cli::{GlobalArgs, InitArgs};

/// Entries appended to .gitignore so local DuckDB files stay untracked
const GITIGNORE_ENTRIES: &[&str] = &["*.duckdb", "*.duckdb.wal"];

const DEFAULT_DB_PATH: &str = "dev.duckdb";

/// Execute the init command
pub(crate) fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let root = Path::new(&global.project_dir);
    println!("Initializing Rewind project...");
    init_project(root, args)?;

    println!();
    println!("✓ Project initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Configure your database in {}", CONFIG_FILE_NAMES[0]);
    println!("  2. Create a migration with: rw migration create --name create-users-table");
    println!("  3. Run migrations with: rw migration run");
    Ok(())
}

/// Create the script directories, rewind.yml and .gitignore entries under
/// `root`. Existing files are left alone unless `--force` is given.
pub(crate) fn init_project(root: &Path, args: &InitArgs) -> Result<()> {
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory: {}", root.display()))?;

    for kind in [ScriptKind::Migration, ScriptKind::Seed] {
        let dir = kind.default_dir();
        let path = root.join(dir);
        if path.exists() && !args.force {
            println!("  Directory {dir}/ already exists, skipping...");
        } else {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            println!("  Created {dir}/");
        }
    }

    let config_name = CONFIG_FILE_NAMES[0];
    let existing = Config::find_in_dir(root);
    match existing {
        Some(path) if !args.force => {
            let file = path.file_name().and_then(|f| f.to_str()).unwrap_or(config_name);
            println!("  {file} already exists, skipping...");
        }
        _ => {
            let name = match &args.name {
                Some(name) => name.clone(),
                None => project_name(root),
            };
            let content = serde_yaml::to_string(&starter_config(&name))
                .context("Failed to serialize config")?;
            fs::write(root.join(config_name), content)
                .with_context(|| format!("Failed to write {config_name}"))?;
            println!("  Created {config_name}");
        }
    }

    update_gitignore(root)
}

/// Starter configuration: a file database for everyday use and an in-memory
/// `test` environment.
fn starter_config(name: &str) -> Config {
    let mut config = Config::scaffold(name);
    config.database = DatabaseConfig {
        path: DEFAULT_DB_PATH.to_string(),
    };
    config.environments.insert(
        "test".to_string(),
        EnvironmentConfig {
            database: Some(DatabaseConfig::default()),
        },
    );
    config
}

/// Directory name of `root`, used when `--name` is not given
fn project_name(root: &Path) -> String {
    fs::canonicalize(root)
        .ok()
        .and_then(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "rewind_project".to_string())
}

fn update_gitignore(root: &Path) -> Result<()> {
    let path = root.join(".gitignore");
    if path.exists() {
        let mut content = fs::read_to_string(&path).context("Failed to read .gitignore")?;
        let missing: Vec<&str> = GITIGNORE_ENTRIES
            .iter()
            .copied()
            .filter(|entry| !content.lines().any(|line| line.trim() == *entry))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        for entry in missing {
            content.push_str(entry);
            content.push('\n');
        }
        fs::write(&path, content).context("Failed to write .gitignore")?;
        println!("  Updated .gitignore");
    } else {
        fs::write(&path, GITIGNORE_ENTRIES.join("\n") + "\n")
            .context("Failed to write .gitignore")?;
        println!("  Created .gitignore");
    }
    Ok(())
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
