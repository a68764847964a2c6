//! Conversation persistence over a key-value store
//!
//! Each conversation is one JSON document under `conversation:<uuid>`. Saves
//! overwrite the whole document with no version check, so when two turns for
//! the same conversation race, the last save wins.

use crate::ports::key_value_store::{KeyValueStore, StoreError};
use parley_domain::{ConversationHistory, ConversationId};
use std::sync::Arc;
use tracing::debug;

const KEY_PREFIX: &str = "conversation:";

#[derive(Clone)]
pub struct ConversationStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ConversationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Storage key for a conversation
    pub fn key(id: ConversationId) -> String {
        format!("{KEY_PREFIX}{id}")
    }

    /// Load a conversation; `Ok(None)` when it was never saved
    pub async fn load(&self, id: ConversationId) -> Result<Option<ConversationHistory>, StoreError> {
        let key = Self::key(id);
        let Some(data) = self.kv.get(&key).await? else {
            debug!("No stored conversation under {}", key);
            return Ok(None);
        };
        let history: ConversationHistory = serde_json::from_str(&data)?;
        debug!("Loaded {} ({} messages)", key, history.len());
        Ok(Some(history))
    }

    /// Write the full history, replacing whatever was stored
    pub async fn save(&self, history: &ConversationHistory) -> Result<(), StoreError> {
        let key = Self::key(history.id());
        let data = serde_json::to_string(history)?;
        self.kv.set(&key, data).await?;
        debug!("Saved {} ({} messages)", key, history.len());
        Ok(())
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore").finish_non_exhaustive()
    }
}
