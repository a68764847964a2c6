//! Application layer for parley
//!
//! This crate contains the conversation aggregate, the routing classifiers,
//! the execution client pool, port definitions and use cases.
//! It depends only on the domain layer.

pub mod config;
pub mod conversation;
pub mod ports;
pub mod tool_registry;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{ExecutionParams, ModelSettings};
pub use conversation::{
    AgentClient, AgentClientFactory, ClientPool, Conversation, ConversationError,
    ConversationServices, ConversationStore, ModelClassifier, SendOptions, ToolClassifier,
};
pub use ports::{
    execution_client::{ClientFactory, ExecutionClient},
    key_value_store::{KeyValueStore, StoreError},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    tool::Tool,
};
pub use tool_registry::ToolRegistry;
pub use use_cases::{
    ConversationSummary, GetConversationError, GetConversationUseCase, ListModelsUseCase,
    ModelEntry, SendMessageError, SendMessageInput, SendMessageOutput, SendMessageUseCase,
    UpdateStatusError, UpdateStatusUseCase,
};
