//! Container lifecycle delegation
//!
//! Each lifecycle command is a fixed list of `docker compose` (or `docker`)
//! invocations. Nothing here interprets their output: the external tool's
//! exit status is the result.

mod action;
mod error;
mod runner;

pub use action::{ComposeAction, Invocation};
pub use error::ComposeError;
pub use runner::ComposeRunner;
