//! Delegated command error types

use thiserror::Error;

/// Errors from running delegated commands
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{invocation}' exited with {}", .code.map(|c| format!("status {}", c)).unwrap_or_else(|| "a signal".to_string()))]
    Failed { invocation: String, code: Option<i32> },
}

impl ComposeError {
    /// Exit code to hand back to the shell
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound => 127,
            Self::Spawn { .. } => 126,
            Self::Failed { code, .. } => code.unwrap_or(1),
        }
    }
}
