//! OpenAI Chat Completions adapter
//!
//! Also works against any endpoint that speaks the same protocol.

use super::ProviderAdapter;
use super::http::{build_client, post_json};
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use parley_application::ports::llm_gateway::{CompletionRequest, GatewayError};
use parley_domain::{ModelMessage, ModelResponse, RequestPart, ResponsePart, Usage, Vendor};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub struct OpenAiAdapter {
    client: Client,
    api_key: String,
    endpoint: String,
    default_max_tokens: u32,
}

impl OpenAiAdapter {
    pub fn new(api_key: String, config: &FileOpenAiConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            api_key,
            endpoint: format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/')),
            default_max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::OpenAi
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, GatewayError> {
        let body = translate_request(request, self.default_max_tokens);

        let builder = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key));
        let text = post_json(builder, &body).await?;

        let response: OpenAiResponse = serde_json::from_str(&text).map_err(|e| {
            GatewayError::InvalidResponse(format!("Failed to parse response: {} - body: {}", e, text))
        })?;
        normalize_response(response)
    }
}

fn translate_request(request: &CompletionRequest, default_max_tokens: u32) -> OpenAiRequest {
    let mut messages = Vec::new();

    if let Some(system) = &request.system {
        messages.push(OpenAiMessage::text("system", system));
    }

    for message in &request.messages {
        match message {
            ModelMessage::Request(req) => {
                for part in &req.parts {
                    messages.push(match part {
                        RequestPart::SystemPrompt { content } => {
                            OpenAiMessage::text("system", content)
                        }
                        RequestPart::UserPrompt { content } => OpenAiMessage::text("user", content),
                        RequestPart::ToolReturn {
                            tool_call_id,
                            content,
                            ..
                        } => OpenAiMessage {
                            role: "tool".to_string(),
                            content: Some(content.clone()),
                            tool_calls: None,
                            tool_call_id: Some(tool_call_id.clone()),
                        },
                    });
                }
            }
            ModelMessage::Response(resp) => {
                let mut text = String::new();
                let mut tool_calls = Vec::new();
                for part in &resp.parts {
                    match part {
                        ResponsePart::Text { content } => text.push_str(content),
                        ResponsePart::ToolCall {
                            tool_name,
                            tool_call_id,
                            args,
                        } => tool_calls.push(OpenAiToolCall {
                            id: tool_call_id.clone(),
                            r#type: "function".to_string(),
                            function: OpenAiFunctionCall {
                                name: tool_name.clone(),
                                arguments: args.to_string(),
                            },
                        }),
                    }
                }
                messages.push(OpenAiMessage {
                    role: "assistant".to_string(),
                    content: if text.is_empty() { None } else { Some(text) },
                    tool_calls: if tool_calls.is_empty() {
                        None
                    } else {
                        Some(tool_calls)
                    },
                    tool_call_id: None,
                });
            }
        }
    }

    let tools: Vec<OpenAiTool> = request
        .tools
        .iter()
        .map(|t| OpenAiTool {
            r#type: "function".to_string(),
            function: OpenAiFunction {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.input_schema(),
            },
        })
        .collect();

    OpenAiRequest {
        model: request.model.clone(),
        messages,
        tools: if tools.is_empty() { None } else { Some(tools) },
        max_completion_tokens: Some(request.settings.max_tokens.unwrap_or(default_max_tokens)),
        temperature: request.settings.temperature,
    }
}

fn normalize_response(resp: OpenAiResponse) -> Result<ModelResponse, GatewayError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("No choices in response".to_string()))?;

    let mut parts = Vec::new();

    if let Some(text) = choice.message.content
        && !text.is_empty()
    {
        parts.push(ResponsePart::Text { content: text });
    }

    for tc in choice.message.tool_calls.unwrap_or_default() {
        if tc.function.name.is_empty() {
            continue;
        }
        // Malformed arguments reach the tool, which reports them back to the model
        let args = serde_json::from_str(&tc.function.arguments).unwrap_or_else(|e| {
            warn!(tool = %tc.function.name, "Unparseable tool arguments: {}", e);
            serde_json::Value::String(tc.function.arguments.clone())
        });
        parts.push(ResponsePart::ToolCall {
            tool_name: tc.function.name,
            tool_call_id: tc.id,
            args,
        });
    }

    let usage = resp
        .usage
        .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();
    let response = ModelResponse::new(parts, usage);
    Ok(match resp.model {
        Some(model) => response.with_model_name(model),
        None => response,
    })
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAiMessage {
    fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAiTool {
    r#type: String,
    function: OpenAiFunction,
}

#[derive(Debug, Serialize)]
struct OpenAiFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    r#type: String,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{ModelRequest, ToolDefinition, ToolParameter};
    use serde_json::json;

    #[test]
    fn test_translate_request_with_tool_history() {
        let messages = vec![
            ModelMessage::user("What is 6 * 7?"),
            ModelResponse::new(
                vec![ResponsePart::ToolCall {
                    tool_name: "calculator".to_string(),
                    tool_call_id: "call_1".to_string(),
                    args: json!({"expression": "6 * 7"}),
                }],
                Usage::new(10, 5),
            )
            .into(),
            ModelRequest {
                parts: vec![RequestPart::ToolReturn {
                    tool_name: "calculator".to_string(),
                    tool_call_id: "call_1".to_string(),
                    content: "42".to_string(),
                }],
            }
            .into(),
        ];
        let calculator = ToolDefinition::new("calculator", "Evaluate math")
            .with_parameter(ToolParameter::new("expression", "Expression", true));
        let request = CompletionRequest::new(Vendor::OpenAi, "gpt-5", messages)
            .with_system("Be brief")
            .with_tools(vec![calculator]);

        let body = serde_json::to_value(translate_request(&request, 2048)).unwrap();

        assert_eq!(body["model"], "gpt-5");
        assert_eq!(body["max_completion_tokens"], 2048);
        assert!(body.get("temperature").is_none());
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "calculator");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], json!({"role": "system", "content": "Be brief"}));
        assert_eq!(messages[1], json!({"role": "user", "content": "What is 6 * 7?"}));
        assert_eq!(messages[2]["role"], "assistant");
        assert!(messages[2].get("content").is_none());
        assert_eq!(
            messages[2]["tool_calls"][0]["function"]["arguments"],
            r#"{"expression":"6 * 7"}"#
        );
        assert_eq!(
            messages[3],
            json!({"role": "tool", "content": "42", "tool_call_id": "call_1"})
        );
    }

    #[test]
    fn test_normalize_response_with_tool_calls() {
        let raw = json!({
            "id": "chatcmpl-1",
            "model": "gpt-5-2025-08-07",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "call_9", "type": "function",
                         "function": {"name": "tavily_search", "arguments": "{\"query\":\"rust\"}"}},
                        {"id": "call_10", "type": "function",
                         "function": {"name": "calculator", "arguments": "not json"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 50, "completion_tokens": 12, "total_tokens": 62}
        });
        let response = normalize_response(serde_json::from_value(raw).unwrap()).unwrap();

        assert_eq!(response.usage, Usage::new(50, 12));
        assert_eq!(response.model_name.as_deref(), Some("gpt-5-2025-08-07"));
        let calls: Vec<_> = response.tool_calls().collect();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, &json!({"query": "rust"}));
        assert_eq!(calls[1].args, &json!("not json"));
    }

    #[test]
    fn test_normalize_response_text() {
        let raw = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello"}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1}
        });
        let response = normalize_response(serde_json::from_value(raw).unwrap()).unwrap();
        assert!(!response.has_tool_calls());
        assert_eq!(ModelMessage::from(response).text(), Some("Hello"));
    }

    #[test]
    fn test_normalize_response_without_choices() {
        let raw = json!({"choices": []});
        let result = normalize_response(serde_json::from_value(raw).unwrap());
        assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
    }
}
