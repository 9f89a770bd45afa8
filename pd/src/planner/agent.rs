//! PlannerAgent - tool-calling conversation loop

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::prompt::{PromptContext, render_instructions};
use crate::config::AgentConfig;
use crate::llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, TokenUsage, ToolCall,
};
use crate::tools::{ToolContext, ToolExecutor, ToolResult};

/// Why a planning run ended without an answer
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("tool '{tool}' failed more than {retries} times")]
    ToolRetriesExceeded { tool: String, retries: u32 },

    #[error("no final answer after {0} iterations")]
    IterationLimit(u32),

    #[error("model returned an empty answer")]
    EmptyResponse,

    #[error("failed to render instructions: {0}")]
    Prompt(#[from] handlebars::RenderError),
}

impl AgentError {
    /// How long the LLM provider asked us to wait, if it rate limited the run
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AgentError::Llm(e) => e.retry_after(),
            _ => None,
        }
    }
}

/// Result of a completed planning run
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// Final answer text
    pub output: String,

    /// LLM calls made, including the final one
    pub iterations: u32,

    /// Accumulated token usage
    pub usage: TokenUsage,
}

/// Drives the model through location and weather lookups to a final answer
pub struct PlannerAgent {
    llm: Arc<dyn LlmClient>,
    tools: ToolExecutor,
    ctx: ToolContext,
    config: AgentConfig,
    max_tokens: u32,
    today: Option<NaiveDate>,
}

impl PlannerAgent {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolExecutor, ctx: ToolContext, config: AgentConfig) -> Self {
        debug!(
            tools = ?tools.tool_names(),
            retries = config.retries,
            max_iterations = config.max_iterations,
            "PlannerAgent::new: called"
        );
        Self {
            llm,
            tools,
            ctx,
            config,
            max_tokens: 1024,
            today: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Pin the date used for `{{today}}`; defaults to the local date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Run the conversation for `prompt` until the model answers
    pub async fn run(&self, prompt: &str) -> Result<AgentRun, AgentError> {
        debug!(prompt_len = prompt.len(), "PlannerAgent::run: called");
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let system_prompt = render_instructions(&self.config.instructions, &PromptContext::for_date(today))?;
        let tool_definitions = self.tools.definitions();

        let mut messages = vec![Message::user(prompt)];
        let mut usage = TokenUsage::default();
        let mut failures: HashMap<String, u32> = HashMap::new();

        for iteration in 1..=self.config.max_iterations {
            let request = CompletionRequest {
                system_prompt: system_prompt.clone(),
                messages: messages.clone(),
                tools: tool_definitions.clone(),
                max_tokens: self.max_tokens,
            };

            let response = self.llm.complete(request).await?;
            usage += response.usage;
            debug!(
                iteration,
                tool_calls = response.tool_calls.len(),
                stop_reason = ?response.stop_reason,
                "PlannerAgent::run: got response"
            );

            if response.tool_calls.is_empty() {
                let output = response.content.as_deref().unwrap_or("").trim();
                if output.is_empty() {
                    warn!(iteration, "PlannerAgent::run: empty answer");
                    return Err(AgentError::EmptyResponse);
                }
                info!(iterations = iteration, tokens = usage.total(), "PlannerAgent: answered");
                return Ok(AgentRun {
                    output: output.to_string(),
                    iterations: iteration,
                    usage,
                });
            }

            messages.push(response_to_message(&response));
            let results = self.tools.execute_all(&response.tool_calls, &self.ctx).await;
            self.count_failures(&response.tool_calls, &results, &mut failures)?;
            messages.push(format_tool_results(&results));
        }

        warn!(max_iterations = self.config.max_iterations, "PlannerAgent::run: iteration limit reached");
        Err(AgentError::IterationLimit(self.config.max_iterations))
    }

    /// Record failed calls; abort once a tool exceeds its retry budget
    fn count_failures(
        &self,
        calls: &[ToolCall],
        results: &[(String, ToolResult)],
        failures: &mut HashMap<String, u32>,
    ) -> Result<(), AgentError> {
        for (call, (_, result)) in calls.iter().zip(results) {
            if !result.is_error {
                continue;
            }
            let count = failures.entry(call.name.clone()).or_insert(0);
            *count += 1;
            warn!(tool = %call.name, failures = *count, error = %result.content, "PlannerAgent: tool call failed");
            if *count > self.config.retries {
                return Err(AgentError::ToolRetriesExceeded {
                    tool: call.name.clone(),
                    retries: self.config.retries,
                });
            }
        }
        Ok(())
    }
}

/// Convert LLM response to message for conversation history
fn response_to_message(response: &CompletionResponse) -> Message {
    let mut blocks = Vec::new();

    if let Some(text) = &response.content
        && !text.is_empty()
    {
        blocks.push(ContentBlock::text(text));
    }

    for call in &response.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        });
    }

    Message::assistant_blocks(blocks)
}

/// Format tool results as a user message
fn format_tool_results(results: &[(String, ToolResult)]) -> Message {
    let blocks: Vec<ContentBlock> = results
        .iter()
        .map(|(id, result)| ContentBlock::tool_result(id, &result.content, result.is_error))
        .collect();

    Message::user_blocks(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{MessageContent, Role, StopReason};
    use reqwest::Client;

    fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            content: Some(text.to_string()),
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        }
    }

    fn tool_response(id: &str, name: &str, input: serde_json::Value) -> CompletionResponse {
        CompletionResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                input,
            }],
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage {
                input_tokens: 20,
                output_tokens: 3,
            },
        }
    }

    fn weather_call(id: &str) -> CompletionResponse {
        tool_response(id, "get_weather", serde_json::json!({"lat": 50.45, "lng": 30.52}))
    }

    fn agent(mock: Arc<MockLlmClient>, config: AgentConfig) -> PlannerAgent {
        // No weather key: the weather tool answers offline
        let ctx = ToolContext::new(Client::new());
        PlannerAgent::new(mock, ToolExecutor::planner(), ctx, config)
            .with_today(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let mock = Arc::new(MockLlmClient::new(vec![text_response("  Go for a walk.  ")]));
        let run = agent(mock.clone(), AgentConfig::default()).run("Plan my day").await.unwrap();

        assert_eq!(run.output, "Go for a walk.");
        assert_eq!(run.iterations, 1);
        assert_eq!(run.usage.total(), 15);

        let requests = mock.requests();
        assert!(requests[0].system_prompt.contains("Сьогодні 2026-10-16."));
        assert_eq!(requests[0].tools.len(), 2);
        assert_eq!(requests[0].max_tokens, 1024);
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let mock = Arc::new(MockLlmClient::new(vec![
            weather_call("call_1"),
            text_response("Sunny and 21 °C: have a picnic in the park."),
        ]));
        let run = agent(mock.clone(), AgentConfig::default()).run("Plan my day").await.unwrap();

        assert_eq!(run.iterations, 2);
        assert_eq!(run.usage.input_tokens, 30);
        assert!(run.output.contains("picnic"));

        let second = &mock.requests()[1];
        assert_eq!(second.messages.len(), 3);
        assert_eq!(second.messages[1].role, Role::Assistant);
        match &second.messages[2].content {
            MessageContent::Blocks(blocks) => match &blocks[0] {
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => {
                    assert_eq!(tool_use_id, "call_1");
                    assert!(content.contains("Sunny"));
                    assert!(!is_error);
                }
                other => panic!("expected tool result, got {:?}", other),
            },
            other => panic!("expected blocks, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_tool_is_reported_and_retried() {
        let mock = Arc::new(MockLlmClient::new(vec![
            tool_response("call_1", "get_weather", serde_json::json!({"lat": "north"})),
            weather_call("call_2"),
            text_response("Stay in and read."),
        ]));
        let run = agent(mock.clone(), AgentConfig::default()).run("Plan my day").await.unwrap();

        assert_eq!(run.iterations, 3);
        assert_eq!(run.output, "Stay in and read.");
    }

    #[tokio::test]
    async fn test_tool_retries_exceeded() {
        let config = AgentConfig {
            retries: 1,
            ..AgentConfig::default()
        };
        let mock = Arc::new(MockLlmClient::new(vec![
            tool_response("call_1", "book_table", serde_json::json!({})),
            tool_response("call_2", "book_table", serde_json::json!({})),
            text_response("unreachable"),
        ]));
        let err = agent(mock.clone(), config).run("Plan my day").await.unwrap_err();

        match err {
            AgentError::ToolRetriesExceeded { tool, retries } => {
                assert_eq!(tool, "book_table");
                assert_eq!(retries, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let config = AgentConfig {
            max_iterations: 2,
            ..AgentConfig::default()
        };
        let mock = Arc::new(MockLlmClient::new(vec![
            weather_call("call_1"),
            weather_call("call_2"),
            text_response("unreachable"),
        ]));
        let err = agent(mock.clone(), config).run("Plan my day").await.unwrap_err();

        assert!(matches!(err, AgentError::IterationLimit(2)));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_answer() {
        let mock = Arc::new(MockLlmClient::new(vec![text_response("   ")]));
        let err = agent(mock, AgentConfig::default()).run("Plan my day").await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let err = agent(mock, AgentConfig::default()).run("Plan my day").await.unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
    }

    #[test]
    fn test_retry_after_only_for_rate_limits() {
        let limited = AgentError::Llm(LlmError::RateLimited {
            retry_after: Duration::from_secs(30),
        });
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(30)));
        assert_eq!(AgentError::EmptyResponse.retry_after(), None);
        assert_eq!(
            AgentError::Llm(LlmError::InvalidResponse("bad".to_string())).retry_after(),
            None
        );
    }

    #[tokio::test]
    async fn test_bad_template() {
        let config = AgentConfig {
            instructions: "Today is {{today".to_string(),
            ..AgentConfig::default()
        };
        let mock = Arc::new(MockLlmClient::new(vec![text_response("hi")]));
        let err = agent(mock.clone(), config).run("Plan my day").await.unwrap_err();

        assert!(matches!(err, AgentError::Prompt(_)));
        assert_eq!(mock.call_count(), 0);
    }
}
