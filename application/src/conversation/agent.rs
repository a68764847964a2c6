//! Tool-loop execution client
//!
//! [`AgentClient`] answers a turn by calling the gateway, running any tools
//! the model asks for, feeding the results back, and repeating until the
//! model replies without tool calls.

use crate::config::{ExecutionParams, ModelSettings};
use crate::ports::execution_client::{ClientFactory, ExecutionClient};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::tool::Tool;
use async_trait::async_trait;
use parley_domain::{
    ConversationHistory, ModelMessage, ModelRequest, ModelResponse, ModelSpec, RequestPart,
    ResponsePart, ToolDefinition, ToolError, Vendor,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct AgentClient {
    vendor: Vendor,
    model: String,
    tools: Vec<Arc<dyn Tool>>,
    definitions: Vec<ToolDefinition>,
    gateway: Arc<dyn LlmGateway>,
    params: ExecutionParams,
}

impl AgentClient {
    pub fn new(
        vendor: Vendor,
        model: impl Into<String>,
        tools: Vec<Arc<dyn Tool>>,
        gateway: Arc<dyn LlmGateway>,
        params: ExecutionParams,
    ) -> Self {
        let definitions = tools.iter().map(|t| t.definition().clone()).collect();
        Self {
            vendor,
            model: model.into(),
            tools,
            definitions,
            gateway,
            params,
        }
    }

    fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &serde_json::Value,
        context: &ConversationHistory,
    ) -> String {
        let result = match self.find_tool(name) {
            Some(tool) => tool.call(args, context).await,
            None => Err(ToolError::not_found(name)),
        };
        match result {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                format!("Error: {}", e)
            }
        }
    }
}

#[async_trait]
impl ExecutionClient for AgentClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.iter().map(|t| t.name().to_string()).collect();
        names.sort();
        names
    }

    async fn run(
        &self,
        history: &ConversationHistory,
        settings: Option<&ModelSettings>,
    ) -> Result<Vec<ModelMessage>, GatewayError> {
        let mut messages: Vec<ModelMessage> = history.message_content().cloned().collect();
        let mut new_messages = Vec::new();
        let mut turn_count = 0;

        loop {
            let request = CompletionRequest::new(self.vendor, &self.model, messages.clone())
                .with_tools(self.definitions.clone())
                .with_settings(settings.copied().unwrap_or_default());

            let response = self.gateway.complete(&request).await?;
            debug!(
                "{} responded with {} parts ({} tokens)",
                self.model,
                response.parts.len(),
                response.usage.total_tokens()
            );

            let calls: Vec<(String, String, serde_json::Value)> = response
                .tool_calls()
                .map(|c| {
                    (
                        c.tool_name.to_string(),
                        c.tool_call_id.to_string(),
                        c.args.clone(),
                    )
                })
                .collect();

            if !calls.is_empty() && turn_count >= self.params.max_tool_turns {
                warn!(
                    "Tool loop for {} reached max_tool_turns ({}); dropping {} pending calls",
                    self.model,
                    self.params.max_tool_turns,
                    calls.len()
                );
                new_messages.push(ModelMessage::Response(tool_limit_answer(
                    response,
                    self.params.max_tool_turns,
                )));
                break;
            }

            let response = ModelMessage::Response(response);
            messages.push(response.clone());
            new_messages.push(response);

            if calls.is_empty() {
                break;
            }
            turn_count += 1;

            info!(
                "{} requested tools: {}",
                self.model,
                calls
                    .iter()
                    .map(|(name, _, _)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            let outputs = futures::future::join_all(
                calls
                    .iter()
                    .map(|(name, _, args)| self.call_tool(name, args, history)),
            )
            .await;

            let parts = calls
                .into_iter()
                .zip(outputs)
                .map(|((tool_name, tool_call_id, _), content)| RequestPart::ToolReturn {
                    tool_name,
                    tool_call_id,
                    content,
                })
                .collect();

            let returns = ModelMessage::Request(ModelRequest { parts });
            messages.push(returns.clone());
            new_messages.push(returns);
        }

        Ok(new_messages)
    }
}

/// Replace a response whose tool calls will not be run with a text answer.
///
/// Every tool call kept in history must be followed by its returns, so the
/// unanswered calls are dropped. Usage and model name are kept.
fn tool_limit_answer(response: ModelResponse, max_tool_turns: usize) -> ModelResponse {
    let text: Vec<&str> = response
        .parts
        .iter()
        .filter_map(|part| match part {
            ResponsePart::Text { content } if !content.trim().is_empty() => Some(content.as_str()),
            _ => None,
        })
        .collect();
    let content = if text.is_empty() {
        format!("Stopped after {max_tool_turns} tool rounds without a final answer.")
    } else {
        text.join("\n")
    };
    ModelResponse {
        parts: vec![ResponsePart::Text { content }],
        ..response
    }
}

/// Builds [`AgentClient`]s sharing one gateway
pub struct AgentClientFactory {
    gateway: Arc<dyn LlmGateway>,
    params: ExecutionParams,
}

impl AgentClientFactory {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: ExecutionParams) -> Self {
        Self { gateway, params }
    }
}

impl ClientFactory for AgentClientFactory {
    fn create(
        &self,
        spec: &ModelSpec,
        api_model: &str,
        tools: Vec<Arc<dyn Tool>>,
    ) -> Arc<dyn ExecutionClient> {
        Arc::new(AgentClient::new(
            spec.vendor,
            api_model,
            tools,
            self.gateway.clone(),
            self.params.clone(),
        ))
    }
}
