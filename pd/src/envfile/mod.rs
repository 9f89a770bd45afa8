//! Environment file handling
//!
//! Scaffolds the credentials template (`.env`) without ever overwriting an
//! existing file, and reads it back so secrets can be resolved at runtime.

mod dotenv;
mod error;
mod template;

pub use dotenv::{Dotenv, Secrets};
pub use error::EnvFileError;
pub use template::{DEFAULT_ENV_PATH, DEFAULT_TEMPLATE, EnsureOutcome, EnvTemplate, ensure_env_file};
