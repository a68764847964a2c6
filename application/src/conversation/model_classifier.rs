//! Phase 1a: choosing the execution model
//!
//! A fast model reads the latest message and names one of a fixed set of
//! routes. Its answer is untrusted: unparseable output or a route outside the
//! allowed set is replaced by the first route, never rejected.

use crate::config::ModelSettings;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use parley_domain::routing::parse_route_decision;
use parley_domain::{
    ConversationHistory, DomainError, ModelMessage, ModelRegistry, ModelRoute, ModelSpec,
    RouteDecision, RouterPromptTemplate,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ModelClassifier {
    spec: ModelSpec,
    api_model: String,
    registry: Arc<ModelRegistry>,
    routes: Vec<(ModelRoute, ModelSpec)>,
    system_prompt: String,
    gateway: Arc<dyn LlmGateway>,
}

impl ModelClassifier {
    /// Bind a classifier to its fast model and the routes it may select.
    ///
    /// Fails with [`DomainError::NoRoutes`] when `routes` is empty and with the
    /// catalog's error when the fast model or a route is not in the catalog.
    pub fn new(
        spec: ModelSpec,
        registry: Arc<ModelRegistry>,
        routes: Vec<ModelRoute>,
        gateway: Arc<dyn LlmGateway>,
    ) -> Result<Self, DomainError> {
        if routes.is_empty() {
            return Err(DomainError::NoRoutes);
        }

        let catalog = registry.catalog();
        let api_model = catalog.api_model(&spec)?.to_string();

        let mut resolved = Vec::with_capacity(routes.len());
        let mut described = Vec::with_capacity(routes.len());
        for route in routes {
            let route_spec = catalog.parse_spec(route.as_str())?;
            let variant = catalog.variant(&route_spec)?;
            let note = variant
                .notes
                .clone()
                .unwrap_or_else(|| format!("{} ({} tier)", variant.family, variant.tier_class.as_str()));
            described.push((route.clone(), note));
            resolved.push((route, route_spec));
        }

        Ok(Self {
            spec,
            api_model,
            registry,
            routes: resolved,
            system_prompt: RouterPromptTemplate::model_router_system(&described),
            gateway,
        })
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn routes(&self) -> Vec<ModelRoute> {
        self.routes.iter().map(|(route, _)| route.clone()).collect()
    }

    /// Ask the fast model for a decision, constrained to the allowed routes.
    pub async fn decide(&self, history: &ConversationHistory) -> Result<RouteDecision, GatewayError> {
        let query = history
            .messages()
            .last()
            .and_then(|m| m.content.text())
            .unwrap_or_default();

        let request = CompletionRequest::new(
            self.spec.vendor,
            &self.api_model,
            vec![ModelMessage::user(query)],
        )
        .with_system(&self.system_prompt)
        .with_settings(ModelSettings::default().with_temperature(0.0));

        let response = self.gateway.complete(&request).await?;
        let raw = ModelMessage::Response(response).text().unwrap_or_default().to_string();
        debug!("Model classifier raw output: {}", raw);

        let allowed = self.routes();
        let decision = match parse_route_decision(&raw) {
            Some(decision) => decision,
            None => {
                warn!("Model classifier output not understood, using {}", allowed[0]);
                RouteDecision::new(
                    allowed[0].clone(),
                    Some("Classifier output not understood".to_string()),
                )
            }
        };

        if !decision.is_allowed(&allowed) {
            warn!(
                "Model classifier chose {} which is not an allowed route",
                decision.model
            );
        }
        Ok(decision.constrain_to(&allowed))
    }

    /// Pick the execution model for the latest message of `history`.
    pub async fn route(&self, history: &ConversationHistory) -> Result<ModelSpec, GatewayError> {
        let decision = self.decide(history).await?;
        let spec = self
            .routes
            .iter()
            .find(|(route, _)| *route == decision.model)
            .map(|(_, spec)| spec.clone())
            .unwrap_or_else(|| self.routes[0].1.clone());

        info!(
            "Model route: {} ({})",
            spec,
            decision.reasoning.as_deref().unwrap_or("no reasoning given")
        );
        Ok(spec)
    }
}

impl std::fmt::Debug for ModelClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClassifier")
            .field("spec", &self.spec)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedGateway, sample_registry};
    use parley_domain::{ConversationId, StoredMessage, Usage, Vendor};

    fn haiku() -> ModelSpec {
        ModelSpec::new(Vendor::Anthropic, "claude-haiku-4-5")
    }

    fn classifier(gateway: Arc<ScriptedGateway>) -> ModelClassifier {
        ModelClassifier::new(
            haiku(),
            Arc::new(sample_registry()),
            ModelRoute::defaults(),
            gateway,
        )
        .unwrap()
    }

    fn history(text: &str) -> ConversationHistory {
        ConversationHistory::new(ConversationId::new())
            .append_message(StoredMessage::new(ModelMessage::user(text)))
    }

    #[tokio::test]
    async fn test_routes_to_selected_model() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_text(
            r#"{"model": "openai:gpt-5", "reasoning": "simple question"}"#,
            Usage::new(50, 10),
        );
        let spec = classifier(gateway.clone())
            .route(&history("What is the capital of France?"))
            .await
            .unwrap();
        assert_eq!(spec, ModelSpec::new(Vendor::OpenAi, "gpt-5"));

        let requests = gateway.requests();
        assert_eq!(requests[0].model, "claude-haiku-4-5-20251001");
        assert_eq!(
            requests[0].messages[0].text(),
            Some("What is the capital of France?")
        );
        let system = requests[0].system.as_deref().unwrap();
        assert!(system.contains("openai:gpt-5: General purpose, fast responses"));
        assert!(system.contains("anthropic:claude-sonnet-4-5-20250929: Complex reasoning"));
    }

    #[tokio::test]
    async fn test_route_outside_allowed_falls_back_to_first() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_text(r#"{"model": "openai:gpt-4o-mini"}"#, Usage::default());
        let classifier = classifier(gateway);

        let spec = classifier.route(&history("hi")).await.unwrap();
        assert_eq!(spec, ModelSpec::new(Vendor::Anthropic, "claude-sonnet-4-5"));
    }

    #[tokio::test]
    async fn test_fallback_reasoning_is_attached() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_text(r#"{"model": "mistral:large"}"#, Usage::default());
        let decision = classifier(gateway).decide(&history("hi")).await.unwrap();
        assert_eq!(decision.model.as_str(), ModelRoute::ANTHROPIC_SONNET);
        assert_eq!(
            decision.reasoning.as_deref(),
            Some("Requested mistral:large not available, using anthropic:claude-sonnet-4-5-20250929")
        );
    }

    #[tokio::test]
    async fn test_unparseable_output_uses_first_route() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_text("I would pick GPT", Usage::default());
        let spec = classifier(gateway).route(&history("hi")).await.unwrap();
        assert_eq!(spec, ModelSpec::new(Vendor::Anthropic, "claude-sonnet-4-5"));
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_error(GatewayError::RateLimited("slow down".to_string()));
        let result = classifier(gateway).route(&history("hi")).await;
        assert!(matches!(result, Err(GatewayError::RateLimited(_))));
    }

    #[tokio::test]
    async fn test_empty_history_sends_empty_query() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_text(r#"{"model": "openai:gpt-5"}"#, Usage::default());
        classifier(gateway.clone())
            .route(&ConversationHistory::new(ConversationId::new()))
            .await
            .unwrap();
        assert_eq!(gateway.requests()[0].messages[0].text(), Some(""));
    }

    #[test]
    fn test_empty_routes_rejected() {
        let result = ModelClassifier::new(
            haiku(),
            Arc::new(sample_registry()),
            vec![],
            Arc::new(ScriptedGateway::new()),
        );
        assert!(matches!(result, Err(DomainError::NoRoutes)));
    }

    #[test]
    fn test_unknown_route_rejected() {
        let result = ModelClassifier::new(
            haiku(),
            Arc::new(sample_registry()),
            vec![ModelRoute::new("openai:gpt-3")],
            Arc::new(ScriptedGateway::new()),
        );
        assert!(matches!(result, Err(DomainError::UnknownModel { .. })));
    }
}
