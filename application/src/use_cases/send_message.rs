//! Send message use case.
//!
//! Loads or starts a conversation, runs one turn and saves the result. This is
//! what a transport layer calls for "user sent a message".

use crate::config::ModelSettings;
use crate::conversation::{
    Conversation, ConversationError, ConversationServices, ConversationStore, SendOptions,
};
use crate::ports::key_value_store::StoreError;
use parley_domain::{ConversationId, ConversationStatus, DomainError, ModelSpec};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SendMessageError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("Conversation {id} is {status} and accepts no new messages")]
    Inactive {
        id: ConversationId,
        status: ConversationStatus,
    },
}

impl From<DomainError> for SendMessageError {
    fn from(e: DomainError) -> Self {
        SendMessageError::Conversation(e.into())
    }
}

impl From<StoreError> for SendMessageError {
    fn from(e: StoreError) -> Self {
        SendMessageError::Conversation(e.into())
    }
}

impl SendMessageError {
    pub fn is_bad_request(&self) -> bool {
        match self {
            SendMessageError::Conversation(e) => e.is_bad_request(),
            SendMessageError::Inactive { .. } => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SendMessageInput {
    pub text: String,
    /// Existing conversation; an id that was never saved starts a new
    /// conversation under that id
    pub conversation_id: Option<ConversationId>,
    /// `"vendor:model"` identifier; skips model routing when set
    pub model: Option<String>,
    pub auto_route: bool,
    pub settings: Option<ModelSettings>,
}

impl SendMessageInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            conversation_id: None,
            model: None,
            auto_route: true,
            settings: None,
        }
    }

    pub fn with_conversation_id(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_auto_route(mut self, auto_route: bool) -> Self {
        self.auto_route = auto_route;
        self
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = Some(settings);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageOutput {
    pub conversation_id: ConversationId,
    pub reply: String,
    pub total_tokens: u64,
    pub message_count: usize,
}

pub struct SendMessageUseCase {
    services: Arc<ConversationServices>,
    store: ConversationStore,
}

impl SendMessageUseCase {
    pub fn new(services: Arc<ConversationServices>, store: ConversationStore) -> Self {
        Self { services, store }
    }

    pub async fn execute(&self, input: SendMessageInput) -> Result<SendMessageOutput, SendMessageError> {
        let spec: Option<ModelSpec> = input
            .model
            .as_deref()
            .map(|m| self.services.registry().resolve_identifier(m))
            .transpose()?;

        let conversation = match input.conversation_id {
            Some(id) => match Conversation::load(&self.store, id, self.services.clone()).await? {
                Some(existing) => existing,
                None => {
                    info!("Starting conversation {} (not found in store)", id);
                    Conversation::start_with_id(id, self.services.clone())
                }
            },
            None => Conversation::start(self.services.clone()),
        };

        let status = conversation.history().status();
        if status != ConversationStatus::Active {
            return Err(SendMessageError::Inactive {
                id: conversation.id(),
                status,
            });
        }

        let mut options = SendOptions::default().with_auto_route(input.auto_route);
        if let Some(spec) = spec {
            options = options.with_spec(spec);
        }
        if let Some(settings) = input.settings {
            options = options.with_settings(settings);
        }

        let updated = conversation.send_message(&input.text, options).await?;
        updated.save(&self.store).await?;

        let history = updated.history();
        Ok(SendMessageOutput {
            conversation_id: history.id(),
            reply: history.last_text().to_string(),
            total_tokens: history.used_tokens(),
            message_count: history.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryKv, ScriptedGateway, plain_services};
    use parley_domain::{ConversationHistory, Usage};

    fn setup() -> (Arc<ScriptedGateway>, SendMessageUseCase, ConversationStore) {
        let gateway = Arc::new(ScriptedGateway::new());
        let store = ConversationStore::new(Arc::new(InMemoryKv::default()));
        let use_case = SendMessageUseCase::new(plain_services(gateway.clone()), store.clone());
        (gateway, use_case, store)
    }

    #[tokio::test]
    async fn test_new_conversation_is_saved() {
        let (gateway, use_case, store) = setup();
        gateway.push_text("Hello!", Usage::new(8, 2));

        let output = use_case.execute(SendMessageInput::new("hi")).await.unwrap();
        assert_eq!(output.reply, "Hello!");
        assert_eq!(output.total_tokens, 10);
        assert_eq!(output.message_count, 2);

        let saved = store.load(output.conversation_id).await.unwrap().unwrap();
        assert_eq!(saved.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_id_starts_under_that_id() {
        let (gateway, use_case, _) = setup();
        gateway.push_text("ok", Usage::default());
        let id = ConversationId::new();

        let output = use_case
            .execute(SendMessageInput::new("hi").with_conversation_id(id))
            .await
            .unwrap();
        assert_eq!(output.conversation_id, id);
    }

    #[tokio::test]
    async fn test_explicit_model_by_alias() {
        let (gateway, use_case, _) = setup();
        gateway.push_text("ok", Usage::default());

        use_case
            .execute(SendMessageInput::new("hi").with_model("anthropic:claude-haiku-4.5"))
            .await
            .unwrap();
        assert_eq!(gateway.requests()[0].model, "claude-haiku-4-5-20251001");
    }

    #[tokio::test]
    async fn test_malformed_model_is_bad_request() {
        let (gateway, use_case, _) = setup();
        let err = use_case
            .execute(SendMessageInput::new("hi").with_model("gpt-5"))
            .await
            .unwrap_err();
        assert!(err.is_bad_request());
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_archived_conversation_rejected() {
        let (gateway, use_case, store) = setup();
        let history = ConversationHistory::new(ConversationId::new())
            .with_status(ConversationStatus::Archived);
        store.save(&history).await.unwrap();

        let err = use_case
            .execute(SendMessageInput::new("hi").with_conversation_id(history.id()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SendMessageError::Inactive {
                status: ConversationStatus::Archived,
                ..
            }
        ));
        assert!(gateway.requests().is_empty());
    }
}
