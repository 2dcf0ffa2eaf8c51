//! Script directory scanning

use crate::error::{CoreError, CoreResult};
use crate::script_id::{ScriptId, SCRIPT_EXTENSION};
use std::path::Path;

/// List the script identifiers in `dir`, ascending.
///
/// Only regular `*.sql` files directly inside `dir` count. A directory that
/// does not exist yet yields an empty list.
pub fn scan_scripts(dir: &Path) -> CoreResult<Vec<ScriptId>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || !path.extension().is_some_and(|e| e == SCRIPT_EXTENSION) {
            continue;
        }

        let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(ScriptId::try_new)
        else {
            continue;
        };

        if !id.is_well_formed() {
            log::warn!(
                "Script '{}' does not follow the <timestamp>-<name> pattern; ordering may be surprising",
                path.display()
            );
        }
        ids.push(id);
    }

    ids.sort();
    Ok(ids)
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod tests;
