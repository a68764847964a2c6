//! Update status use case.
//!
//! Archiving and deleting are status changes; the record stays in the store.

use crate::conversation::ConversationStore;
use crate::ports::key_value_store::StoreError;
use parley_domain::{ConversationHistory, ConversationId, ConversationStatus};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum UpdateStatusError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct UpdateStatusUseCase {
    store: ConversationStore,
}

impl UpdateStatusUseCase {
    pub fn new(store: ConversationStore) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        id: ConversationId,
        status: ConversationStatus,
    ) -> Result<ConversationHistory, UpdateStatusError> {
        let history = self
            .store
            .load(id)
            .await?
            .ok_or(UpdateStatusError::NotFound(id))?;

        if history.status() == status {
            return Ok(history);
        }

        let updated = history.with_status(status);
        self.store.save(&updated).await?;
        info!("Conversation {} is now {}", id, status);
        Ok(updated)
    }

    pub async fn archive(&self, id: ConversationId) -> Result<ConversationHistory, UpdateStatusError> {
        self.execute(id, ConversationStatus::Archived).await
    }

    pub async fn delete(&self, id: ConversationId) -> Result<ConversationHistory, UpdateStatusError> {
        self.execute(id, ConversationStatus::Deleted).await
    }

    pub async fn reactivate(&self, id: ConversationId) -> Result<ConversationHistory, UpdateStatusError> {
        self.execute(id, ConversationStatus::Active).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryKv;
    use parley_domain::{ModelMessage, StoredMessage};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_archive_keeps_messages() {
        let store = ConversationStore::new(Arc::new(InMemoryKv::default()));
        let history = ConversationHistory::new(ConversationId::new())
            .append_message(StoredMessage::new(ModelMessage::user("hi")));
        store.save(&history).await.unwrap();

        let use_case = UpdateStatusUseCase::new(store.clone());
        use_case.archive(history.id()).await.unwrap();

        let stored = store.load(history.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), ConversationStatus::Archived);
        assert_eq!(stored.messages(), history.messages());

        use_case.reactivate(history.id()).await.unwrap();
        let stored = store.load(history.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), ConversationStatus::Active);
    }

    #[tokio::test]
    async fn test_missing_conversation_is_not_found() {
        let store = ConversationStore::new(Arc::new(InMemoryKv::default()));
        let result = UpdateStatusUseCase::new(store)
            .delete(ConversationId::new())
            .await;
        assert!(matches!(result, Err(UpdateStatusError::NotFound(_))));
    }
}
