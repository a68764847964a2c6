//! The conversation aggregate
//!
//! A [`Conversation`] is an immutable value: [`Conversation::send_message`]
//! returns a new conversation holding the extended history and leaves the
//! receiver untouched. The shared, mutable parts (the client pool cache) live
//! in [`ConversationServices`], which every conversation value points at.
//!
//! One turn runs in two phases:
//!
//! ```text
//! text ──▶ append user message
//!            │
//!            ├─ 1a. model: explicit spec │ model classifier │ registry default
//!            ├─ 1b. tools: tool classifier │ all tools
//!            │
//!            └─ 2.  pool.get_client(model, tools).run(history) ──▶ append replies
//! ```

use super::client_pool::ClientPool;
use super::error::ConversationError;
use super::model_classifier::ModelClassifier;
use super::store::ConversationStore;
use super::tool_classifier::ToolClassifier;
use crate::config::ModelSettings;
use crate::ports::key_value_store::StoreError;
use parley_domain::{
    ConversationHistory, ConversationId, ModelMessage, ModelRegistry, ModelSpec, StoredMessage,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Collaborators shared by every conversation
#[derive(Debug)]
pub struct ConversationServices {
    registry: Arc<ModelRegistry>,
    pool: Arc<ClientPool>,
    model_classifier: Option<Arc<ModelClassifier>>,
    tool_classifier: Option<Arc<ToolClassifier>>,
}

impl ConversationServices {
    pub fn new(registry: Arc<ModelRegistry>, pool: Arc<ClientPool>) -> Self {
        Self {
            registry,
            pool,
            model_classifier: None,
            tool_classifier: None,
        }
    }

    pub fn with_model_classifier(mut self, classifier: Arc<ModelClassifier>) -> Self {
        self.model_classifier = Some(classifier);
        self
    }

    pub fn with_tool_classifier(mut self, classifier: Arc<ToolClassifier>) -> Self {
        self.tool_classifier = Some(classifier);
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn pool(&self) -> &Arc<ClientPool> {
        &self.pool
    }

    pub fn has_model_classifier(&self) -> bool {
        self.model_classifier.is_some()
    }

    pub fn has_tool_classifier(&self) -> bool {
        self.tool_classifier.is_some()
    }
}

/// Per-message options for [`Conversation::send_message`]
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Explicit execution model; skips model routing entirely
    pub spec: Option<ModelSpec>,
    /// Passed through to the execution client untouched
    pub settings: Option<ModelSettings>,
    pub auto_route: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            spec: None,
            settings: None,
            auto_route: true,
        }
    }
}

impl SendOptions {
    pub fn with_spec(mut self, spec: ModelSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_auto_route(mut self, auto_route: bool) -> Self {
        self.auto_route = auto_route;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Conversation {
    history: ConversationHistory,
    services: Arc<ConversationServices>,
}

impl Conversation {
    /// A new, empty conversation with a fresh id
    pub fn start(services: Arc<ConversationServices>) -> Self {
        Self::start_with_id(ConversationId::new(), services)
    }

    /// A new, empty conversation under a caller-chosen id
    pub fn start_with_id(id: ConversationId, services: Arc<ConversationServices>) -> Self {
        Self::from_history(ConversationHistory::new(id), services)
    }

    pub fn from_history(history: ConversationHistory, services: Arc<ConversationServices>) -> Self {
        Self { history, services }
    }

    /// Load a saved conversation; `Ok(None)` when the id was never saved.
    pub async fn load(
        store: &ConversationStore,
        id: ConversationId,
        services: Arc<ConversationServices>,
    ) -> Result<Option<Self>, StoreError> {
        Ok(store
            .load(id)
            .await?
            .map(|history| Self::from_history(history, services)))
    }

    pub async fn save(&self, store: &ConversationStore) -> Result<(), StoreError> {
        store.save(&self.history).await
    }

    pub fn id(&self) -> ConversationId {
        self.history.id()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn services(&self) -> &Arc<ConversationServices> {
        &self.services
    }

    /// Run one turn and return the conversation that results from it.
    ///
    /// `self` is not modified; on error nothing about the turn is kept.
    pub async fn send_message(
        &self,
        text: &str,
        options: SendOptions,
    ) -> Result<Conversation, ConversationError> {
        let history = self
            .history
            .append_message(StoredMessage::new(ModelMessage::user(text)));

        let spec = self.select_model(&history, &options).await?;
        let tools = self.select_tools(text, &options).await?;

        let client = self.services.pool.get_client(&spec, tools.as_deref())?;
        debug!(
            "Conversation {} running {} with tools {:?}",
            history.id(),
            spec,
            client.tool_names()
        );

        let replies = client.run(&history, options.settings.as_ref()).await?;
        let history = history.append_messages(replies.into_iter().map(StoredMessage::new));

        info!(
            "Conversation {} answered by {} ({} messages, {} tokens)",
            history.id(),
            spec,
            history.len(),
            history.used_tokens()
        );

        Ok(Conversation {
            history,
            services: self.services.clone(),
        })
    }

    async fn select_model(
        &self,
        history: &ConversationHistory,
        options: &SendOptions,
    ) -> Result<ModelSpec, ConversationError> {
        if let Some(spec) = &options.spec {
            return Ok(self.services.registry.resolve_spec(spec)?);
        }
        match &self.services.model_classifier {
            Some(classifier) if options.auto_route => Ok(classifier.route(history).await?),
            _ => Ok(self.services.registry.default_spec().clone()),
        }
    }

    async fn select_tools(
        &self,
        text: &str,
        options: &SendOptions,
    ) -> Result<Option<Vec<String>>, ConversationError> {
        match &self.services.tool_classifier {
            Some(classifier) if options.auto_route => Ok(Some(classifier.route(text).await?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionParams;
    use crate::conversation::agent::AgentClientFactory;
    use crate::ports::llm_gateway::GatewayError;
    use crate::test_support::{
        EchoTool, InMemoryKv, ScriptedGateway, sample_catalog, sample_registry, tool_call_response,
    };
    use crate::tool_registry::ToolRegistry;
    use parley_domain::{ConversationStatus, DomainError, ModelRoute, Usage, Vendor};
    use serde_json::json;

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        services: Arc<ConversationServices>,
    }

    fn harness_with(registry: ModelRegistry, tools: ToolRegistry, routed: bool) -> Harness {
        let gateway = Arc::new(ScriptedGateway::new());
        let registry = Arc::new(registry);
        let tools = Arc::new(tools);
        let factory = Arc::new(AgentClientFactory::new(
            gateway.clone(),
            ExecutionParams::default(),
        ));
        let pool = Arc::new(ClientPool::new(registry.clone(), tools.clone(), factory));
        let mut services = ConversationServices::new(registry.clone(), pool);
        if routed {
            let fast = ModelSpec::new(Vendor::Anthropic, "claude-haiku-4-5");
            services = services
                .with_model_classifier(Arc::new(
                    ModelClassifier::new(
                        fast.clone(),
                        registry.clone(),
                        ModelRoute::defaults(),
                        gateway.clone(),
                    )
                    .unwrap(),
                ))
                .with_tool_classifier(Arc::new(
                    ToolClassifier::new(fast, &registry, tools, gateway.clone()).unwrap(),
                ));
        }
        Harness {
            gateway,
            services: Arc::new(services),
        }
    }

    fn harness(routed: bool) -> Harness {
        let tools = ToolRegistry::new()
            .register(EchoTool::arc("calculator"))
            .register(EchoTool::arc("tavily_search"));
        harness_with(sample_registry(), tools, routed)
    }

    fn gpt_mini() -> ModelSpec {
        ModelSpec::new(Vendor::OpenAi, "gpt-4o-mini")
    }

    #[tokio::test]
    async fn test_explicit_spec_with_calculator_only() {
        let tools = ToolRegistry::new().register(EchoTool::arc("calculator"));
        let h = harness_with(sample_registry(), tools, false);
        h.gateway
            .push(tool_call_response("calculator", json!({"expression": "2+2"})));
        h.gateway.push_text("4", Usage::new(30, 2));

        let conversation = Conversation::start(h.services.clone());
        let options = SendOptions::default()
            .with_spec(gpt_mini())
            .with_auto_route(false);
        let updated = conversation.send_message("2+2?", options).await.unwrap();

        assert_eq!(updated.id(), conversation.id());
        assert!(conversation.history().is_empty());
        assert_eq!(updated.history().len(), 4);
        assert_eq!(updated.history().last_text(), "4");
        assert_eq!(updated.history().used_tokens(), 42);

        let requests = h.gateway.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert_eq!(requests[0].tools.len(), 1);
    }

    #[tokio::test]
    async fn test_auto_route_uses_both_classifiers() {
        let h = harness(true);
        h.gateway
            .push_text(r#"{"model": "openai:gpt-5", "reasoning": "simple"}"#, Usage::default());
        h.gateway
            .push_text(r#"{"tools": ["tavily_search", "weather"]}"#, Usage::default());
        h.gateway.push_text("Here is the news", Usage::new(100, 20));

        let updated = Conversation::start(h.services.clone())
            .send_message("Latest Rust news?", SendOptions::default())
            .await
            .unwrap();
        assert_eq!(updated.history().last_text(), "Here is the news");

        let requests = h.gateway.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].model, "claude-haiku-4-5-20251001");
        assert_eq!(requests[1].messages[0].text(), Some("Latest Rust news?"));
        assert_eq!(requests[2].model, "gpt-5");
        let tool_names: Vec<&str> = requests[2].tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tool_names, vec!["tavily_search"]);
    }

    #[tokio::test]
    async fn test_explicit_spec_skips_model_classifier() {
        let h = harness(true);
        h.gateway.push_text(r#"{"tools": []}"#, Usage::default());
        h.gateway.push_text("hello", Usage::default());

        Conversation::start(h.services.clone())
            .send_message("hi", SendOptions::default().with_spec(gpt_mini()))
            .await
            .unwrap();

        let requests = h.gateway.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].system.as_deref().unwrap().contains("select which tools"));
        assert_eq!(requests[1].model, "gpt-4o-mini");
        assert!(requests[1].tools.is_empty());
    }

    #[tokio::test]
    async fn test_auto_route_off_uses_default_and_all_tools() {
        let h = harness(true);
        h.gateway.push_text("hello", Usage::default());

        Conversation::start(h.services.clone())
            .send_message("hi", SendOptions::default().with_auto_route(false))
            .await
            .unwrap();

        let requests = h.gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "claude-sonnet-4-5-20250929");
        assert_eq!(requests[0].tools.len(), 2);
    }

    #[tokio::test]
    async fn test_settings_passed_through() {
        let h = harness(false);
        h.gateway.push_text("ok", Usage::default());
        let settings = ModelSettings::default().with_temperature(0.7).with_max_tokens(256);

        Conversation::start(h.services.clone())
            .send_message("hi", SendOptions::default().with_settings(settings))
            .await
            .unwrap();
        assert_eq!(h.gateway.requests()[0].settings, settings);
    }

    #[tokio::test]
    async fn test_not_allow_listed_spec_is_bad_request() {
        let catalog = sample_catalog();
        let registry = ModelRegistry::from_specs(
            catalog,
            ModelSpec::new(Vendor::Anthropic, "claude-sonnet-4-5"),
            vec![],
        )
        .unwrap();
        let h = harness_with(registry, ToolRegistry::new(), false);

        let err = Conversation::start(h.services.clone())
            .send_message("hi", SendOptions::default().with_spec(gpt_mini()))
            .await
            .unwrap_err();
        assert!(err.is_bad_request());
        assert!(matches!(
            err,
            ConversationError::Domain(DomainError::NotAllowListed(_))
        ));
        assert!(h.gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_execution_failure_leaves_conversation_unchanged() {
        let h = harness(false);
        h.gateway.push_error(GatewayError::Timeout);
        let conversation = Conversation::start(h.services.clone());

        let err = conversation
            .send_message("hi", SendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConversationError::Gateway(GatewayError::Timeout)));
        assert!(!err.is_bad_request());
        assert!(conversation.history().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_then_start_with_id_roundtrip() {
        let h = harness(false);
        let store = ConversationStore::new(Arc::new(InMemoryKv::default()));
        let id = ConversationId::new();

        assert!(
            Conversation::load(&store, id, h.services.clone())
                .await
                .unwrap()
                .is_none()
        );

        let conversation = Conversation::start_with_id(id, h.services.clone());
        conversation.save(&store).await.unwrap();
        let loaded = Conversation::load(&store, id, h.services.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.history(), conversation.history());
        assert_eq!(loaded.history().status(), ConversationStatus::Active);
    }

    #[tokio::test]
    async fn test_sequential_turns_accumulate_in_store() {
        let h = harness(false);
        let store = ConversationStore::new(Arc::new(InMemoryKv::default()));
        h.gateway.push_text("first", Usage::new(10, 1));
        h.gateway
            .push(tool_call_response("calculator", json!({"expression": "3*3"})));
        h.gateway.push_text("9", Usage::new(10, 1));

        let first = Conversation::start(h.services.clone())
            .send_message("hello", SendOptions::default())
            .await
            .unwrap();
        first.save(&store).await.unwrap();
        let first_count = first.history().len();

        let loaded = Conversation::load(&store, first.id(), h.services.clone())
            .await
            .unwrap()
            .unwrap();
        let second = loaded
            .send_message("3*3?", SendOptions::default())
            .await
            .unwrap();
        second.save(&store).await.unwrap();

        let stored = store.load(first.id()).await.unwrap().unwrap();
        assert_eq!(first_count, 2);
        assert_eq!(stored.len(), first_count + 4);
        assert_eq!(stored.last_text(), "9");

        // the second turn saw the first turn's messages
        assert_eq!(h.gateway.requests()[1].messages.len(), 3);
    }
}
