//! Execution client port
//!
//! An execution client answers one conversation turn with a fixed model and a
//! fixed tool set. Clients hold no conversation state, so one cached client
//! serves any number of conversations.

use crate::config::ModelSettings;
use crate::ports::llm_gateway::GatewayError;
use crate::ports::tool::Tool;
use async_trait::async_trait;
use parley_domain::{ConversationHistory, ModelMessage, ModelSpec};
use std::sync::Arc;

#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Provider-facing model id this client calls
    fn model(&self) -> &str;

    /// Names of the tools this client exposes to the model, sorted
    fn tool_names(&self) -> Vec<String>;

    /// Answer the latest message of `history`.
    ///
    /// Returns the new messages in order: a single response, or when tools
    /// were used, the tool-call response, the tool-return request, and so on,
    /// ending with the final response.
    async fn run(
        &self,
        history: &ConversationHistory,
        settings: Option<&ModelSettings>,
    ) -> Result<Vec<ModelMessage>, GatewayError>;
}

/// Builds execution clients for the client pool on cache misses
pub trait ClientFactory: Send + Sync {
    fn create(
        &self,
        spec: &ModelSpec,
        api_model: &str,
        tools: Vec<Arc<dyn Tool>>,
    ) -> Arc<dyn ExecutionClient>;
}
