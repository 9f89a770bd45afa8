//! ToolExecutor - dispatches tool calls by name

use std::collections::HashMap;
use tracing::debug;

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{LocationTool, WeatherTool};
use super::{Tool, ToolContext, ToolResult};

/// Registry of tools available to the model
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Executor with the day-planning tools
    pub fn planner() -> Self {
        debug!("ToolExecutor::planner: called");
        let mut executor = Self::empty();
        executor.add_tool(Box::new(LocationTool));
        executor.add_tool(Box::new(WeatherTool));
        executor
    }

    /// Create an empty executor (for testing)
    pub fn empty() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the executor
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        debug!(tool_name = %tool.name(), "ToolExecutor::add_tool: called");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get tool definitions for LLM, ordered by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(tool_name = %tool_call.name, tool_id = %tool_call.id, "ToolExecutor::execute: called");
        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.execute(tool_call.input.clone(), ctx).await,
            None => {
                debug!("ToolExecutor::execute: unknown tool");
                ToolResult::error(format!("Unknown tool: {}", tool_call.name))
            }
        }
    }

    /// Execute multiple tool calls in order
    pub async fn execute_all(&self, tool_calls: &[ToolCall], ctx: &ToolContext) -> Vec<(String, ToolResult)> {
        debug!(count = %tool_calls.len(), "ToolExecutor::execute_all: called");
        let mut results = Vec::with_capacity(tool_calls.len());

        for call in tool_calls {
            let result = self.execute(call, ctx).await;
            results.push((call.id.clone(), result));
        }

        results
    }

    /// Get tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::planner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[test]
    fn test_planner_executor_has_tools() {
        let executor = ToolExecutor::planner();
        assert_eq!(executor.tool_names(), vec!["get_user_location_by_ip", "get_weather"]);
    }

    #[test]
    fn test_definitions_sorted() {
        let defs = ToolExecutor::planner().definitions();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["get_user_location_by_ip", "get_weather"]);
        assert!(defs[1].input_schema["required"].is_array());
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let executor = ToolExecutor::planner();
        let ctx = ToolContext::new(Client::new());

        let call = ToolCall {
            id: "call_1".to_string(),
            name: "book_restaurant".to_string(),
            input: serde_json::json!({}),
        };

        let result = executor.execute(&call, &ctx).await;
        assert!(result.is_error);
        assert_eq!(result.content, "Unknown tool: book_restaurant");
    }

    #[tokio::test]
    async fn test_execute_all_keeps_ids_and_order() {
        let executor = ToolExecutor::planner();
        let ctx = ToolContext::new(Client::new());
        let calls = vec![
            ToolCall {
                id: "a".to_string(),
                name: "get_weather".to_string(),
                input: serde_json::json!({"lat": 1.0, "lng": 2.0}),
            },
            ToolCall {
                id: "b".to_string(),
                name: "nope".to_string(),
                input: serde_json::json!({}),
            },
        ];

        let results = executor.execute_all(&calls, &ctx).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "a");
        assert!(!results[0].1.is_error);
        assert_eq!(results[1].0, "b");
        assert!(results[1].1.is_error);
    }
}
