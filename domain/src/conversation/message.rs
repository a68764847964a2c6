//! Provider-neutral model messages
//!
//! A conversation is a sequence of [`ModelMessage`]s. Requests carry what was
//! sent to the model (user prompts, system prompts, tool results); responses
//! carry what the model produced (text, tool calls) together with the token
//! usage the provider reported.
//!
//! A turn that used tools produces, in order: a response with tool calls, a
//! request with the tool returns, and a final response with the answer text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token usage reported by the provider for one response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

impl Usage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl std::ops::Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage::new(
            self.input_tokens + rhs.input_tokens,
            self.output_tokens + rhs.output_tokens,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum RequestPart {
    SystemPrompt {
        content: String,
    },
    UserPrompt {
        content: String,
    },
    ToolReturn {
        tool_name: String,
        tool_call_id: String,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum ResponsePart {
    Text {
        content: String,
    },
    ToolCall {
        tool_name: String,
        tool_call_id: String,
        #[serde(default)]
        args: serde_json::Value,
    },
}

/// Message sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    pub parts: Vec<RequestPart>,
}

/// Message produced by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub parts: Vec<ResponsePart>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRef<'a> {
    pub tool_name: &'a str,
    pub tool_call_id: &'a str,
    pub args: &'a serde_json::Value,
}

impl ModelResponse {
    pub fn new(parts: Vec<ResponsePart>, usage: Usage) -> Self {
        Self {
            parts,
            usage,
            model_name: None,
            timestamp: Utc::now(),
        }
    }

    pub fn text(content: impl Into<String>, usage: Usage) -> Self {
        Self::new(
            vec![ResponsePart::Text {
                content: content.into(),
            }],
            usage,
        )
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = ToolCallRef<'_>> {
        self.parts.iter().filter_map(|part| match part {
            ResponsePart::ToolCall {
                tool_name,
                tool_call_id,
                args,
            } => Some(ToolCallRef {
                tool_name,
                tool_call_id,
                args,
            }),
            ResponsePart::Text { .. } => None,
        })
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls().next().is_some()
    }
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelMessage {
    Request(ModelRequest),
    Response(ModelResponse),
}

impl ModelMessage {
    /// A request holding a single user prompt
    pub fn user(text: impl Into<String>) -> Self {
        ModelMessage::Request(ModelRequest {
            parts: vec![RequestPart::UserPrompt {
                content: text.into(),
            }],
        })
    }

    /// Content of the first part carrying plain text, if any.
    ///
    /// Tool calls carry structured arguments, not text, and are skipped.
    pub fn text(&self) -> Option<&str> {
        match self {
            ModelMessage::Request(request) => request.parts.first().map(|part| match part {
                RequestPart::SystemPrompt { content }
                | RequestPart::UserPrompt { content }
                | RequestPart::ToolReturn { content, .. } => content.as_str(),
            }),
            ModelMessage::Response(response) => {
                response.parts.iter().find_map(|part| match part {
                    ResponsePart::Text { content } => Some(content.as_str()),
                    ResponsePart::ToolCall { .. } => None,
                })
            }
        }
    }

    pub fn usage(&self) -> Option<&Usage> {
        match self {
            ModelMessage::Response(response) => Some(&response.usage),
            ModelMessage::Request(_) => None,
        }
    }

    pub fn is_response(&self) -> bool {
        matches!(self, ModelMessage::Response(_))
    }
}

impl From<ModelRequest> for ModelMessage {
    fn from(request: ModelRequest) -> Self {
        ModelMessage::Request(request)
    }
}

impl From<ModelResponse> for ModelMessage {
    fn from(response: ModelResponse) -> Self {
        ModelMessage::Response(response)
    }
}
