//! Shared fakes for unit tests

use crate::config::ModelSettings;
use crate::ports::execution_client::{ClientFactory, ExecutionClient};
use crate::ports::key_value_store::{KeyValueStore, StoreError};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::tool::Tool;
use async_trait::async_trait;
use parley_domain::{
    ConversationHistory, ModelCatalog, ModelMessage, ModelRegistry, ModelResponse, ModelSpec,
    ResponsePart, ToolDefinition, ToolError, Usage, Vendor,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const SAMPLE_CATALOG: &str = r#"{
    "anthropic": {
        "template_key": "anthropic",
        "supports_native_thinking": true,
        "allowed_markers": ["claude"],
        "available_models": [
            {"id": "claude-haiku-4-5", "api_id": "claude-haiku-4-5-20251001",
             "family": "claude-haiku", "tier": "haiku-4.5", "tier_class": "fast",
             "aliases": ["claude-haiku-4.5"], "notes": "Fast, inexpensive"},
            {"id": "claude-sonnet-4-5", "api_id": "claude-sonnet-4-5-20250929",
             "family": "claude-sonnet", "tier": "sonnet-4.5", "tier_class": "standard",
             "notes": "Complex reasoning, code, analysis"}
        ]
    },
    "openai": {
        "template_key": "openai",
        "allowed_markers": ["gpt"],
        "available_models": [
            {"id": "gpt-4o-mini", "api_id": "gpt-4o-mini", "family": "gpt-4o",
             "tier": "mini", "tier_class": "fast"},
            {"id": "gpt-5", "api_id": "gpt-5", "family": "gpt-5", "tier": "gpt-5",
             "notes": "General purpose, fast responses"}
        ]
    }
}"#;

pub fn sample_catalog() -> Arc<ModelCatalog> {
    Arc::new(ModelCatalog::from_json_str(SAMPLE_CATALOG).unwrap())
}

/// Every sample model allow-listed, Claude Sonnet as default
pub fn sample_registry() -> ModelRegistry {
    let catalog = sample_catalog();
    let all: Vec<ModelSpec> = Vendor::ALL
        .iter()
        .flat_map(|v| catalog.specs_for(*v))
        .collect();
    ModelRegistry::from_specs(
        catalog,
        ModelSpec::new(Vendor::Anthropic, "claude-sonnet-4-5"),
        all,
    )
    .unwrap()
}

/// Tool answering with its own name and the raw arguments
pub struct EchoTool {
    definition: ToolDefinition,
}

impl EchoTool {
    pub fn arc(name: &str) -> Arc<dyn Tool> {
        Arc::new(Self {
            definition: ToolDefinition::new(name, format!("Echo tool {name}")),
        })
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(
        &self,
        args: &serde_json::Value,
        _context: &ConversationHistory,
    ) -> Result<String, ToolError> {
        Ok(format!("{}:{}", self.definition.name, args))
    }
}

/// Response holding one tool call with id `call_<name>`
pub fn tool_call_response(name: &str, args: serde_json::Value) -> ModelResponse {
    ModelResponse::new(
        vec![ResponsePart::ToolCall {
            tool_name: name.to_string(),
            tool_call_id: format!("call_{name}"),
            args,
        }],
        Usage::new(5, 5),
    )
}

/// Gateway replaying queued responses and recording every request
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Result<ModelResponse, GatewayError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ModelResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_text(&self, text: &str, usage: Usage) {
        self.push(ModelResponse::text(text, usage));
    }

    pub fn push_error(&self, error: GatewayError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("script exhausted".to_string())))
    }
}

/// Client that answers "stub" and remembers how it was built
pub struct StubClient {
    model: String,
    tool_names: Vec<String>,
}

#[async_trait]
impl ExecutionClient for StubClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn tool_names(&self) -> Vec<String> {
        self.tool_names.clone()
    }

    async fn run(
        &self,
        _history: &ConversationHistory,
        _settings: Option<&ModelSettings>,
    ) -> Result<Vec<ModelMessage>, GatewayError> {
        Ok(vec![ModelResponse::text("stub", Usage::new(1, 1)).into()])
    }
}

/// Factory counting how many clients it built
#[derive(Default)]
pub struct CountingFactory {
    created: AtomicUsize,
}

impl CountingFactory {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ClientFactory for CountingFactory {
    fn create(
        &self,
        _spec: &ModelSpec,
        api_model: &str,
        tools: Vec<Arc<dyn Tool>>,
    ) -> Arc<dyn ExecutionClient> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let mut tool_names: Vec<String> = tools.iter().map(|t| t.name().to_string()).collect();
        tool_names.sort();
        Arc::new(StubClient {
            model: api_model.to_string(),
            tool_names,
        })
    }
}

#[derive(Default)]
pub struct InMemoryKv {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryKv {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.data.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.data.lock().unwrap().remove(key).is_some())
    }
}

/// Services without classifiers, executing through `gateway` with an echo
/// calculator as the only tool
pub fn plain_services(
    gateway: Arc<ScriptedGateway>,
) -> Arc<crate::conversation::ConversationServices> {
    use crate::config::ExecutionParams;
    use crate::conversation::{AgentClientFactory, ClientPool, ConversationServices};
    use crate::tool_registry::ToolRegistry;

    let registry = Arc::new(sample_registry());
    let tools = Arc::new(ToolRegistry::new().register(EchoTool::arc("calculator")));
    let factory = Arc::new(AgentClientFactory::new(gateway, ExecutionParams::default()));
    let pool = Arc::new(ClientPool::new(registry.clone(), tools, factory));
    Arc::new(ConversationServices::new(registry, pool))
}
