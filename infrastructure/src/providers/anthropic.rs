//! Anthropic Messages API adapter

use super::ProviderAdapter;
use super::http::{build_client, post_json};
use crate::config::FileAnthropicConfig;
use async_trait::async_trait;
use parley_application::ports::llm_gateway::{CompletionRequest, GatewayError};
use parley_domain::{ModelMessage, ModelResponse, RequestPart, ResponsePart, Usage, Vendor};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct AnthropicAdapter {
    client: Client,
    api_key: String,
    endpoint: String,
    api_version: String,
    default_max_tokens: u32,
}

impl AnthropicAdapter {
    pub fn new(api_key: String, config: &FileAnthropicConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            api_key,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            api_version: config.api_version.clone(),
            default_max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Anthropic
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, GatewayError> {
        let body = translate_request(request, self.default_max_tokens);

        let builder = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version);
        let text = post_json(builder, &body).await?;

        let response: AnthropicResponse = serde_json::from_str(&text).map_err(|e| {
            GatewayError::InvalidResponse(format!("Failed to parse response: {} - body: {}", e, text))
        })?;
        Ok(normalize_response(response))
    }
}

fn translate_request(request: &CompletionRequest, default_max_tokens: u32) -> AnthropicRequest {
    let mut system: Vec<String> = request.system.iter().cloned().collect();
    let mut messages: Vec<AnthropicMessage> = Vec::new();

    for message in &request.messages {
        let (role, blocks) = match message {
            ModelMessage::Request(req) => {
                let mut blocks = Vec::new();
                for part in &req.parts {
                    match part {
                        RequestPart::SystemPrompt { content } => system.push(content.clone()),
                        RequestPart::UserPrompt { content } => {
                            if !content.is_empty() {
                                blocks.push(AnthropicContentBlock::Text {
                                    text: content.clone(),
                                });
                            }
                        }
                        RequestPart::ToolReturn {
                            tool_call_id,
                            content,
                            ..
                        } => blocks.push(AnthropicContentBlock::ToolResult {
                            tool_use_id: tool_call_id.clone(),
                            content: content.clone(),
                        }),
                    }
                }
                ("user", blocks)
            }
            ModelMessage::Response(resp) => {
                let blocks = resp
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        ResponsePart::Text { content } if content.is_empty() => None,
                        ResponsePart::Text { content } => Some(AnthropicContentBlock::Text {
                            text: content.clone(),
                        }),
                        ResponsePart::ToolCall {
                            tool_name,
                            tool_call_id,
                            args,
                        } => Some(AnthropicContentBlock::ToolUse {
                            id: tool_call_id.clone(),
                            name: tool_name.clone(),
                            input: if args.is_object() {
                                args.clone()
                            } else {
                                serde_json::json!({})
                            },
                        }),
                    })
                    .collect();
                ("assistant", blocks)
            }
        };

        if blocks.is_empty() {
            continue;
        }
        // The API wants strictly alternating roles
        match messages.last_mut() {
            Some(last) if last.role == role => last.content.extend(blocks),
            _ => messages.push(AnthropicMessage {
                role: role.to_string(),
                content: blocks,
            }),
        }
    }

    let tools: Vec<AnthropicTool> = request
        .tools
        .iter()
        .map(|t| AnthropicTool {
            name: t.name.clone(),
            description: t.description.clone(),
            input_schema: t.input_schema(),
        })
        .collect();

    AnthropicRequest {
        model: request.model.clone(),
        max_tokens: request.settings.max_tokens.unwrap_or(default_max_tokens),
        system: if system.is_empty() {
            None
        } else {
            Some(system.join("\n\n"))
        },
        messages,
        tools: if tools.is_empty() { None } else { Some(tools) },
        temperature: request.settings.temperature,
    }
}

fn normalize_response(resp: AnthropicResponse) -> ModelResponse {
    let parts = resp
        .content
        .into_iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(ResponsePart::Text { content: text }),
            AnthropicContentBlock::ToolUse { id, name, input } => Some(ResponsePart::ToolCall {
                tool_name: name,
                tool_call_id: id,
                args: input,
            }),
            // Tool results never appear in responses
            AnthropicContentBlock::ToolResult { .. } | AnthropicContentBlock::Other => None,
        })
        .collect();

    let usage = Usage::new(resp.usage.input_tokens, resp.usage.output_tokens);
    let response = ModelResponse::new(parts, usage);
    match resp.model {
        Some(model) => response.with_model_name(model),
        None => response,
    }
}

// Anthropic API types

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<AnthropicTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
    /// Thinking and other block kinds we do not surface
    #[serde(other, skip_serializing)]
    Other,
}

#[derive(Debug, Serialize)]
struct AnthropicTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    model: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_application::ModelSettings;
    use parley_domain::{ModelRequest, ToolDefinition, ToolParameter};
    use serde_json::json;

    fn tool_turn() -> Vec<ModelMessage> {
        vec![
            ModelMessage::user("What is 6 * 7?"),
            ModelResponse::new(
                vec![ResponsePart::ToolCall {
                    tool_name: "calculator".to_string(),
                    tool_call_id: "toolu_1".to_string(),
                    args: json!({"expression": "6 * 7"}),
                }],
                Usage::new(10, 5),
            )
            .into(),
            ModelRequest {
                parts: vec![RequestPart::ToolReturn {
                    tool_name: "calculator".to_string(),
                    tool_call_id: "toolu_1".to_string(),
                    content: "42".to_string(),
                }],
            }
            .into(),
        ]
    }

    #[test]
    fn test_translate_request_with_tools() {
        let calculator = ToolDefinition::new("calculator", "Evaluate math")
            .with_parameter(ToolParameter::new("expression", "Expression", true));
        let request = CompletionRequest::new(Vendor::Anthropic, "claude-sonnet-4-5-20250929", tool_turn())
            .with_system("Be brief")
            .with_tools(vec![calculator])
            .with_settings(ModelSettings::default().with_temperature(0.2));

        let body = serde_json::to_value(translate_request(&request, 4096)).unwrap();

        assert_eq!(body["model"], "claude-sonnet-4-5-20250929");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["system"], "Be brief");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(body["tools"][0]["name"], "calculator");
        assert_eq!(body["tools"][0]["input_schema"]["required"], json!(["expression"]));

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"][0], json!({"type": "text", "text": "What is 6 * 7?"}));
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"][0]["type"], "tool_use");
        assert_eq!(messages[1]["content"][0]["input"]["expression"], "6 * 7");
        assert_eq!(
            messages[2]["content"][0],
            json!({"type": "tool_result", "tool_use_id": "toolu_1", "content": "42"})
        );
    }

    #[test]
    fn test_translate_request_defaults() {
        let request = CompletionRequest::new(Vendor::Anthropic, "m", vec![ModelMessage::user("hi")]);
        let body = serde_json::to_value(translate_request(&request, 8192)).unwrap();

        assert_eq!(body["max_tokens"], 8192);
        assert!(body.get("system").is_none());
        assert!(body.get("tools").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_system_parts_are_hoisted_and_roles_merged() {
        let messages = vec![
            ModelRequest {
                parts: vec![RequestPart::SystemPrompt {
                    content: "From history".to_string(),
                }],
            }
            .into(),
            ModelMessage::user("one"),
            ModelMessage::user("two"),
        ];
        let request = CompletionRequest::new(Vendor::Anthropic, "m", messages).with_system("Top");
        let body = serde_json::to_value(translate_request(&request, 1)).unwrap();

        assert_eq!(body["system"], "Top\n\nFrom history");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["content"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_response() {
        let raw = json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-5-20250929",
            "content": [
                {"type": "thinking", "thinking": "hmm", "signature": "x"},
                {"type": "text", "text": "Let me calculate."},
                {"type": "tool_use", "id": "toolu_2", "name": "calculator", "input": {"expression": "1+1"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 120, "output_tokens": 30}
        });
        let response: AnthropicResponse = serde_json::from_value(raw).unwrap();
        let response = normalize_response(response);

        assert_eq!(response.parts.len(), 2);
        assert_eq!(response.usage, Usage::new(120, 30));
        assert_eq!(response.model_name.as_deref(), Some("claude-sonnet-4-5-20250929"));
        let call = response.tool_calls().next().unwrap();
        assert_eq!(call.tool_name, "calculator");
        assert_eq!(call.tool_call_id, "toolu_2");
    }
}
