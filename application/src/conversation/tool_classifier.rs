//! Phase 1b: choosing the tools for a query
//!
//! Tool selection looks at the raw query only, not the whole history.

use crate::config::ModelSettings;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::tool_registry::ToolRegistry;
use parley_domain::routing::parse_tool_decision;
use parley_domain::{DomainError, ModelMessage, ModelRegistry, ModelSpec, RouterPromptTemplate};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ToolClassifier {
    spec: ModelSpec,
    api_model: String,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    gateway: Arc<dyn LlmGateway>,
}

impl ToolClassifier {
    pub fn new(
        spec: ModelSpec,
        registry: &ModelRegistry,
        tools: Arc<ToolRegistry>,
        gateway: Arc<dyn LlmGateway>,
    ) -> Result<Self, DomainError> {
        let api_model = registry.catalog().api_model(&spec)?.to_string();
        let system_prompt = RouterPromptTemplate::tool_router_system(&tools.definitions());
        Ok(Self {
            spec,
            api_model,
            tools,
            system_prompt,
            gateway,
        })
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Names of the tools needed for `query`.
    ///
    /// Names the registry does not know are dropped. Output that cannot be
    /// parsed selects no tools.
    pub async fn route(&self, query: &str) -> Result<Vec<String>, GatewayError> {
        let request = CompletionRequest::new(
            self.spec.vendor,
            &self.api_model,
            vec![ModelMessage::user(query)],
        )
        .with_system(&self.system_prompt)
        .with_settings(ModelSettings::default().with_temperature(0.0));

        let response = self.gateway.complete(&request).await?;
        let raw = ModelMessage::Response(response).text().unwrap_or_default().to_string();
        debug!("Tool classifier raw output: {}", raw);

        let Some(decision) = parse_tool_decision(&raw) else {
            warn!("Tool classifier output not understood, selecting no tools");
            return Ok(Vec::new());
        };

        let requested = decision.tools.len();
        let reasoning = decision.reasoning.clone();
        let tools = decision.retain_known(|name| self.tools.contains(name));
        if tools.len() < requested {
            warn!(
                "Tool classifier named {} unknown tool(s); dropped",
                requested - tools.len()
            );
        }

        info!(
            "Tool route: {:?} ({})",
            tools,
            reasoning.as_deref().unwrap_or("no reasoning given")
        );
        Ok(tools)
    }
}

impl std::fmt::Debug for ToolClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolClassifier")
            .field("spec", &self.spec)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}
