//! SQL script files with `-- up` / `-- down` sections.
//!
//! A script file looks like:
//!
//! ```sql
//! -- up
//! CREATE TABLE users (id INTEGER, email VARCHAR);
//!
//! -- down
//! DROP TABLE users;
//! ```
//!
//! A comment line whose text is exactly `up` or `down` (any case) opens a
//! section. Text before the first marker is a header and is ignored. A file
//! with no markers at all is one forward operation with no reverse.

use crate::error::{RunnerError, RunnerResult};
use crate::loader::{
    Direction, Operation, OperationResult, ScriptContext, ScriptLoader, ScriptUnit,
};
use rw_core::ScriptId;
use std::path::Path;
use std::sync::Arc;

/// The two sections of a SQL script; `None` means the marker is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlSections {
    /// Forward SQL
    pub up: Option<String>,
    /// Reverse SQL
    pub down: Option<String>,
}

/// Split a script's text into its sections.
pub fn parse_sections(content: &str) -> SqlSections {
    let mut up: Option<Vec<&str>> = None;
    let mut down: Option<Vec<&str>> = None;
    let mut current: Option<Direction> = None;

    for line in content.lines() {
        if let Some(direction) = section_marker(line) {
            section_mut(&mut up, &mut down, direction).get_or_insert_with(Vec::new);
            current = Some(direction);
            continue;
        }
        if let Some(direction) = current {
            section_mut(&mut up, &mut down, direction)
                .get_or_insert_with(Vec::new)
                .push(line);
        }
    }

    if current.is_none() {
        return SqlSections {
            up: Some(content.to_string()),
            down: None,
        };
    }

    SqlSections {
        up: up.map(|lines| lines.join("\n")),
        down: down.map(|lines| lines.join("\n")),
    }
}

fn section_mut<'s, 'l>(
    up: &'s mut Option<Vec<&'l str>>,
    down: &'s mut Option<Vec<&'l str>>,
    direction: Direction,
) -> &'s mut Option<Vec<&'l str>> {
    match direction {
        Direction::Up => up,
        Direction::Down => down,
    }
}

fn section_marker(line: &str) -> Option<Direction> {
    let text = line.trim().strip_prefix("--")?.trim();
    if text.eq_ignore_ascii_case("up") {
        Some(Direction::Up)
    } else if text.eq_ignore_ascii_case("down") {
        Some(Direction::Down)
    } else {
        None
    }
}

/// Whether `sql` contains anything besides blank lines and `--` comments
pub fn has_statements(sql: &str) -> bool {
    sql.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with("--")
    })
}

/// One section of a SQL script, run as a multi-statement batch
pub struct SqlOperation {
    sql: String,
}

impl SqlOperation {
    /// Wrap the SQL text of one section
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    /// The SQL this operation runs
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Operation for SqlOperation {
    fn run(&self, ctx: &ScriptContext<'_>) -> OperationResult {
        if !has_statements(&self.sql) {
            log::debug!("{}: section has no statements, nothing to run", ctx.id());
            return Ok(());
        }
        ctx.execute_batch(&self.sql)?;
        Ok(())
    }
}

/// Default loader: reads `<dir>/<id>.sql` and splits it into sections
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlFileLoader;

impl ScriptLoader for SqlFileLoader {
    fn load(&self, dir: &Path, id: &ScriptId) -> RunnerResult<ScriptUnit> {
        let path = dir.join(id.file_name());
        if !path.is_file() {
            return Err(RunnerError::ScriptNotFound {
                id: id.to_string(),
                location: dir.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            RunnerError::Core(rw_core::CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })
        })?;
        let sections = parse_sections(&content);

        let op = |sql: String| -> Arc<dyn Operation> { Arc::new(SqlOperation::new(sql)) };
        Ok(ScriptUnit::new(
            id.clone(),
            sections.up.map(op),
            sections.down.map(op),
        ))
    }
}

#[cfg(test)]
#[path = "sql_file_test.rs"]
mod tests;
