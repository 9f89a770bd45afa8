//! Environment file error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scaffolding or reading an environment file
#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid template line '{line}': expected KEY=VALUE")]
    InvalidTemplateLine { line: String },

    #[error("Parse error at line {line_number}: {reason}")]
    Parse { line_number: usize, reason: String },
}

impl EnvFileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Underlying IO error kind, if this is an IO failure
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
