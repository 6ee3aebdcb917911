use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::WarehouseError;
use crate::types::Parameters;

static TEMPLATE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("template pattern is valid")
});

/// Resolves logical command names to SQL text.
///
/// A command `reports` (or `reports.sql`) resolves to the contents of
/// `<directory>/reports.sql`, rendered against the parameter bindings when
/// the file uses `{{name}}` placeholders. A name with no matching file is
/// returned untouched, so callers can pass literal SQL through the same
/// path.
#[derive(Debug, Clone)]
pub struct CommandLoader {
    directory: PathBuf,
}

impl CommandLoader {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Resolve `command` to SQL text.
    ///
    /// # Errors
    ///
    /// Returns `WarehouseError::Io` for any file failure other than the
    /// file not existing (which falls back to literal text).
    pub fn load(&self, command: &str, parameters: &Parameters) -> Result<String, WarehouseError> {
        let name = command.strip_suffix(".sql").unwrap_or(command);
        let path = self.directory.join(format!("{name}.sql"));
        let template = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(command, "no command file; treating as literal SQL");
                return Ok(command.to_string());
            }
            Err(err) => return Err(err.into()),
        };
        debug!(command, path = %path.display(), "loaded command file");
        if parameters.is_empty() {
            Ok(template)
        } else {
            Ok(render(&template, parameters))
        }
    }
}

fn render(template: &str, parameters: &Parameters) -> String {
    TEMPLATE_VAR
        .replace_all(template, |caps: &Captures<'_>| {
            parameters
                .get(&caps[1])
                .map(ToString::to_string)
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bound_names() {
        let params = Parameters::new().with("limit", 10).with("name", "alice");
        let out = render("SELECT * FROM t WHERE name = '{{ name }}' LIMIT {{limit}}", &params);
        assert_eq!(out, "SELECT * FROM t WHERE name = 'alice' LIMIT 10");
    }

    #[test]
    fn unbound_names_render_empty() {
        let out = render("LIMIT {{limit}}", &Parameters::new());
        assert_eq!(out, "LIMIT ");
    }
}
