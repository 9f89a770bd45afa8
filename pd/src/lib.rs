//! PlannerDay - weather-aware day planning agent
//!
//! The agent locates the user by IP address, checks the current weather there
//! and asks an LLM for activity recommendations. The same CLI scaffolds the
//! `.env` file holding API keys and wraps `docker compose` for the container
//! lifecycle.
//!
//! # Modules
//!
//! - [`envfile`] - `.env` scaffolding and secret lookup
//! - [`compose`] - container lifecycle delegation
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`tools`] - location and weather tools
//! - [`planner`] - tool-calling agent loop
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod compose;
pub mod config;
pub mod domain;
pub mod envfile;
pub mod llm;
pub mod planner;
pub mod tools;

pub use compose::{ComposeAction, ComposeError, ComposeRunner};
pub use config::Config;
pub use envfile::{EnsureOutcome, EnvFileError, EnvTemplate, Secrets, ensure_env_file};
pub use planner::{AgentError, AgentRun, PlannerAgent};
