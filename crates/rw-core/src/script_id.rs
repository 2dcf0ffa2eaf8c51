//! Script identifiers: `<14-digit-timestamp>-<slug>`.
//!
//! The identifier is the script file's name without its `.sql` extension.
//! Because the timestamp prefix is fixed-width, lexicographic order on the
//! whole identifier is creation order.

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_newtype_string;
use chrono::NaiveDateTime;

/// Extension of script files picked up by the scanner.
pub const SCRIPT_EXTENSION: &str = "sql";

/// Width of the `%Y%m%d%H%M%S` prefix.
pub const TIMESTAMP_LEN: usize = 14;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

define_newtype_string! {
    /// Identifier of one migration or seed script.
    pub struct ScriptId;
}

impl ScriptId {
    /// Build the identifier for a new script created at `now`.
    pub fn generate(slug: &str, now: NaiveDateTime) -> CoreResult<Self> {
        validate_slug(slug)?;
        Ok(Self(format!("{}-{}", now.format(TIMESTAMP_FORMAT), slug)))
    }

    /// The timestamp prefix, if the identifier is well formed.
    pub fn timestamp(&self) -> Option<&str> {
        self.split().map(|(ts, _)| ts)
    }

    /// The human label after the timestamp, if the identifier is well formed.
    pub fn slug(&self) -> Option<&str> {
        self.split().map(|(_, slug)| slug)
    }

    /// Whether the identifier follows `<14 digits>-<slug>`.
    pub fn is_well_formed(&self) -> bool {
        self.split().is_some()
    }

    /// File name of the script inside its directory.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, SCRIPT_EXTENSION)
    }

    fn split(&self) -> Option<(&str, &str)> {
        let (ts, slug) = self.0.split_once('-')?;
        let digits = ts.len() == TIMESTAMP_LEN && ts.bytes().all(|b| b.is_ascii_digit());
        (digits && validate_slug(slug).is_ok()).then_some((ts, slug))
    }
}

/// Check that `slug` is usable as the label part of an identifier.
///
/// Allowed: ASCII letters, digits, `-` and `_`; must not start with `-` or `.`.
pub fn validate_slug(slug: &str) -> CoreResult<()> {
    let invalid = |reason: &str| CoreError::InvalidScriptName {
        name: slug.to_string(),
        reason: reason.to_string(),
    };

    if slug.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if slug.starts_with('-') || slug.starts_with('.') {
        return Err(invalid("name must not start with '-' or '.'"));
    }
    if let Some(c) = slug
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(&format!(
            "unexpected character {c:?}; use letters, digits, '-' or '_'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "script_id_test.rs"]
mod tests;
