//! Credentials template scaffolding

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::EnvFileError;

/// Default location of the environment file
pub const DEFAULT_ENV_PATH: &str = ".env";

/// Placeholder lines written into a fresh environment file
pub const DEFAULT_TEMPLATE: [&str; 2] = ["WEATHER_API_KEY=your_weather_api_key", "GEO_API_KEY=your_geo_api_key"];

/// A validated environment file template: where to write and what to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTemplate {
    path: PathBuf,
    lines: Vec<String>,
}

impl EnvTemplate {
    /// Build a template, rejecting any line that is not `KEY=VALUE`
    pub fn new(path: impl Into<PathBuf>, lines: Vec<String>) -> Result<Self, EnvFileError> {
        let path = path.into();
        debug!(?path, line_count = lines.len(), "EnvTemplate::new: called");

        for line in &lines {
            let valid = !line.contains('\n')
                && !line.contains('\r')
                && line.split_once('=').is_some_and(|(key, _)| !key.trim().is_empty());
            if !valid {
                debug!(%line, "EnvTemplate::new: rejecting line");
                return Err(EnvFileError::InvalidTemplateLine { line: line.clone() });
            }
        }

        Ok(Self { path, lines })
    }

    /// Default template at the given path
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lines: DEFAULT_TEMPLATE.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// File content: every line newline-terminated
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Placeholder value the template assigns to `key`, if any
    pub fn placeholder_for(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.split_once('='))
            .find(|(k, _)| k.trim() == key)
            .map(|(_, v)| v.trim())
    }
}

impl Default for EnvTemplate {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_ENV_PATH)
    }
}

/// What `ensure_env_file` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The file was absent and has been written from the template
    Created,
    /// A file was already present and was left untouched
    AlreadyExists,
}

impl EnsureOutcome {
    /// Human-readable notice for the console
    pub fn notice(&self, path: &Path) -> String {
        match self {
            Self::Created => format!(
                "Created {}. Edit it and replace the placeholder values with your API keys.",
                path.display()
            ),
            Self::AlreadyExists => format!("{} already exists", path.display()),
        }
    }
}

/// Create the environment file from `template` unless something is already there.
///
/// Uses exclusive creation, so concurrent callers cannot clobber each other:
/// exactly one of them sees `Created`. Existing files are never written to.
pub fn ensure_env_file(template: &EnvTemplate) -> Result<EnsureOutcome, EnvFileError> {
    let path = template.path();
    debug!(?path, "ensure_env_file: called");

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let meta = fs::metadata(path).map_err(|e| EnvFileError::io(path, e))?;
            if !meta.is_file() {
                debug!(?path, "ensure_env_file: path exists but is not a regular file");
                return Err(EnvFileError::io(
                    path,
                    io::Error::new(io::ErrorKind::InvalidInput, "path exists but is not a regular file"),
                ));
            }
            info!(?path, "Environment file already exists, leaving it untouched");
            return Ok(EnsureOutcome::AlreadyExists);
        }
        Err(e) => {
            debug!(?path, error = %e, "ensure_env_file: create failed");
            return Err(EnvFileError::io(path, e));
        }
    };

    let content = template.render();
    if let Err(e) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
        warn!(?path, error = %e, "Failed to write environment file, removing partial file");
        drop(file);
        let _ = fs::remove_file(path);
        return Err(EnvFileError::io(path, e));
    }

    info!(?path, lines = template.lines().len(), "Created environment file");
    Ok(EnsureOutcome::Created)
}
