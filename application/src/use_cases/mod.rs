//! Use cases
//!
//! Entry points a transport layer (CLI, HTTP) calls. Each one wraps the
//! conversation aggregate and the store for a single operation.

pub mod get_conversation;
pub mod list_models;
pub mod send_message;
pub mod update_status;

pub use get_conversation::{ConversationSummary, GetConversationError, GetConversationUseCase};
pub use list_models::{ListModelsUseCase, ModelEntry};
pub use send_message::{
    SendMessageError, SendMessageInput, SendMessageOutput, SendMessageUseCase,
};
pub use update_status::{UpdateStatusError, UpdateStatusUseCase};
