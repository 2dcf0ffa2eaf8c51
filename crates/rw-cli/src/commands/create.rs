//! Create command implementation - scaffolds a new timestamped script file

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use minijinja::{context, Environment};
use rw_core::{ScriptId, ScriptKind};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::{title, ProjectContext};

const SCRIPT_TEMPLATE: &str = r#"-- {{ title }}: {{ slug }}
-- Created at: {{ created_at }}
--
-- Statements after the up marker run on `rw {{ noun }} run`.
-- Statements after the down marker run on `rw {{ noun }} undo` and should
-- reverse them. Delete the down section if this {{ noun }} cannot be undone.

-- up
{% if noun == "seed" -%}
-- INSERT INTO users (id, email) VALUES (1, 'admin@example.com');
{%- else -%}
-- CREATE TABLE users (id INTEGER PRIMARY KEY, email VARCHAR NOT NULL);
{%- endif %}

-- down
{% if noun == "seed" -%}
-- DELETE FROM users WHERE id = 1;
{%- else -%}
-- DROP TABLE users;
{%- endif %}
"#;

/// Execute `migration create` / `seed generate`
pub(crate) fn execute(args: &CreateArgs, kind: ScriptKind, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let dir = ctx.scripts_dir(kind);
    let path = create_script(&dir, kind, &args.name, Local::now().naive_local())?;

    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    let label = match kind {
        ScriptKind::Migration => "Migration",
        ScriptKind::Seed => "Seed file",
    };

    println!("✓ {label} created: {file_name}");
    println!("  Path: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit the {} file to add your {} logic", kind.noun(), kind.noun());
    println!("  2. Run it with: rw {} run", kind.noun());
    Ok(())
}

/// Write `<dir>/<timestamp>-<slug>.sql` from the template and return its path.
///
/// Creates `dir` if needed and refuses to overwrite an existing file.
pub(crate) fn create_script(
    dir: &Path,
    kind: ScriptKind,
    slug: &str,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let id = ScriptId::generate(slug, now)?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(id.file_name());
    if path.exists() {
        anyhow::bail!(
            "{} already exists. Wait a second or choose a different name.",
            path.display()
        );
    }

    let content = render_script(kind, slug, now)?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Created {} {}", kind.noun(), id);
    Ok(path)
}

/// Render the starter content for a new script
pub(crate) fn render_script(kind: ScriptKind, slug: &str, now: NaiveDateTime) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("script.sql", SCRIPT_TEMPLATE)
        .context("Invalid script template")?;
    let template = env.get_template("script.sql")?;
    let rendered = template
        .render(context! {
            title => title(kind),
            noun => kind.noun(),
            slug => slug,
            created_at => now.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .context("Failed to render script template")?;
    Ok(rendered)
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
