//! Reading `.env` files and resolving secrets

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::{EnvFileError, EnvTemplate};

/// Parsed `KEY=VALUE` pairs, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dotenv {
    entries: Vec<(String, String)>,
}

impl Dotenv {
    /// Parse `.env` content
    ///
    /// Blank lines and `#` comments are skipped, as are lines without `=`.
    /// Values lose one layer of matching single or double quotes.
    pub fn parse(content: &str) -> Result<Self, EnvFileError> {
        debug!(len = content.len(), "Dotenv::parse: called");
        let mut entries = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                debug!(line_number = idx + 1, "Dotenv::parse: skipping line without '='");
                continue;
            };

            let key = key.trim();
            let key = key.strip_prefix("export ").map(str::trim).unwrap_or(key);
            if key.is_empty() {
                return Err(EnvFileError::Parse {
                    line_number: idx + 1,
                    reason: "empty key".to_string(),
                });
            }

            entries.push((key.to_string(), unquote(value.trim()).to_string()));
        }

        Ok(Self { entries })
    }

    /// Load and parse a file; a missing file is an empty set
    pub fn load(path: &Path) -> Result<Self, EnvFileError> {
        debug!(?path, "Dotenv::load: called");
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(?path, "Dotenv::load: file not found, using empty set");
                Ok(Self::default())
            }
            Err(e) => Err(EnvFileError::io(path, e)),
        }
    }

    /// Last value assigned to `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Secret lookup: process environment first, then the `.env` file.
///
/// Empty values and the template's own placeholders count as unset.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    dotenv: Dotenv,
    template: EnvTemplate,
}

impl Secrets {
    pub fn new(dotenv: Dotenv, template: EnvTemplate) -> Self {
        debug!(entries = dotenv.len(), "Secrets::new: called");
        Self { dotenv, template }
    }

    /// Load `.env` from the template's path and wrap it
    pub fn load(template: EnvTemplate) -> Result<Self, EnvFileError> {
        let dotenv = Dotenv::load(template.path())?;
        Ok(Self::new(dotenv, template))
    }

    /// Resolve a secret by name
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.resolve_from(key, std::env::var(key).ok())
    }

    fn resolve_from(&self, key: &str, process_value: Option<String>) -> Option<String> {
        debug!(%key, from_process = process_value.is_some(), "Secrets::resolve_from: called");
        process_value
            .filter(|v| self.is_usable(key, v))
            .or_else(|| {
                self.dotenv
                    .get(key)
                    .filter(|v| self.is_usable(key, v))
                    .map(str::to_string)
            })
    }

    fn is_usable(&self, key: &str, value: &str) -> bool {
        let value = value.trim();
        !value.is_empty() && self.template.placeholder_for(key) != Some(value)
    }
}
