//! Tool system for the planner agent
//!
//! Tools are what the model can call during a planning run. Each call gets a
//! shared `ToolContext` carrying the HTTP client and resolved API keys.

mod context;
mod error;
mod executor;
mod traits;

pub mod builtin;

pub use context::ToolContext;
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use traits::{Tool, ToolResult};
