//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use crate::config::ModelSettings;
use async_trait::async_trait;
use parley_domain::{ModelMessage, ModelResponse, ToolDefinition, Vendor};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One provider call: a conversation plus the tools the model may use.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub vendor: Vendor,
    /// Provider-facing model id (the catalog's `api_id`)
    pub model: String,
    pub system: Option<String>,
    pub messages: Vec<ModelMessage>,
    pub tools: Vec<ToolDefinition>,
    pub settings: ModelSettings,
}

impl CompletionRequest {
    pub fn new(vendor: Vendor, model: impl Into<String>, messages: Vec<ModelMessage>) -> Self {
        Self {
            vendor,
            model: model.into(),
            system: None,
            messages,
            tools: Vec::new(),
            settings: ModelSettings::default(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Run one completion and return the model's response.
    ///
    /// The response carries the provider-reported token usage.
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, GatewayError>;
}
