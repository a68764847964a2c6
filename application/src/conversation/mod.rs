//! Conversation orchestration
//!
//! The [`Conversation`] aggregate and the components it drives: the two
//! routing classifiers, the execution client pool and the persistence
//! adapter.

pub mod agent;
pub mod aggregate;
pub mod client_pool;
pub mod error;
pub mod model_classifier;
pub mod store;
pub mod tool_classifier;

pub use agent::{AgentClient, AgentClientFactory};
pub use aggregate::{Conversation, ConversationServices, SendOptions};
pub use client_pool::ClientPool;
pub use error::ConversationError;
pub use model_classifier::ModelClassifier;
pub use store::ConversationStore;
pub use tool_classifier::ToolClassifier;
