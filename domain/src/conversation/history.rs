//! Persistence-ready conversation state

use super::ids::{ConversationId, MessageId};
use super::message::ModelMessage;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a stored conversation.
///
/// Nothing in this crate enforces `Deleted`; removal is left to whoever
/// garbage-collects the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Active,
    Archived,
    Deleted,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Active => "active",
            ConversationStatus::Archived => "archived",
            ConversationStatus::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A model message with its persistence identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub content: ModelMessage,
}

impl StoredMessage {
    /// Wrap a message under a fresh id
    pub fn new(content: ModelMessage) -> Self {
        Self {
            id: MessageId::new(),
            content,
        }
    }
}

/// The serializable state of one conversation.
///
/// Messages are append-only and their order is the conversation order. Every
/// update returns a new value; the receiver is left as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    id: ConversationId,
    #[serde(default)]
    messages: Vec<StoredMessage>,
    #[serde(default)]
    status: ConversationStatus,
}

impl ConversationHistory {
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            status: ConversationStatus::Active,
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn messages(&self) -> &[StoredMessage] {
        &self.messages
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The bare model messages, in order, as handed to an execution client
    pub fn message_content(&self) -> impl Iterator<Item = &ModelMessage> {
        self.messages.iter().map(|m| &m.content)
    }

    /// Sum of the provider-reported token usage of every response.
    ///
    /// Observability only; nothing enforces a budget against it.
    pub fn used_tokens(&self) -> u64 {
        self.message_content()
            .filter_map(ModelMessage::usage)
            .map(|usage| usage.total_tokens())
            .sum()
    }

    /// Text of the latest message, or `""` when it has no text part
    pub fn last_text(&self) -> &str {
        self.messages
            .last()
            .and_then(|m| m.content.text())
            .unwrap_or_default()
    }

    pub fn append_message(&self, msg: StoredMessage) -> Self {
        self.append_messages(std::iter::once(msg))
    }

    pub fn append_messages(&self, msgs: impl IntoIterator<Item = StoredMessage>) -> Self {
        let mut messages = self.messages.clone();
        messages.extend(msgs);
        Self {
            id: self.id,
            messages,
            status: self.status,
        }
    }

    pub fn with_status(&self, status: ConversationStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
