//! Get conversation use case.

use crate::conversation::ConversationStore;
use crate::ports::key_value_store::StoreError;
use parley_domain::{ConversationHistory, ConversationId, ConversationStatus};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GetConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Summary of a stored conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: ConversationId,
    pub message_count: usize,
    pub total_tokens: u64,
    pub status: ConversationStatus,
    #[serde(skip)]
    pub history: ConversationHistory,
}

impl From<ConversationHistory> for ConversationSummary {
    fn from(history: ConversationHistory) -> Self {
        Self {
            conversation_id: history.id(),
            message_count: history.len(),
            total_tokens: history.used_tokens(),
            status: history.status(),
            history,
        }
    }
}

pub struct GetConversationUseCase {
    store: ConversationStore,
}

impl GetConversationUseCase {
    pub fn new(store: ConversationStore) -> Self {
        Self { store }
    }

    pub async fn execute(&self, id: ConversationId) -> Result<ConversationSummary, GetConversationError> {
        self.store
            .load(id)
            .await?
            .map(ConversationSummary::from)
            .ok_or(GetConversationError::NotFound(id))
    }
}
