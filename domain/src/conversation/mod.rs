//! Conversation identity and history
//!
//! [`ConversationHistory`] is the unit that gets persisted: an id, the ordered
//! [`StoredMessage`]s and a [`ConversationStatus`]. The message payloads are
//! provider-neutral [`ModelMessage`]s.

pub mod history;
pub mod ids;
pub mod message;

pub use history::{ConversationHistory, ConversationStatus, StoredMessage};
pub use ids::{ConversationId, MessageId};
pub use message::{ModelMessage, ModelRequest, ModelResponse, RequestPart, ResponsePart, ToolCallRef, Usage};
