//! Startup wiring
//!
//! Turns a loaded [`FileConfig`] into the long-lived objects a process needs:
//! the model registry, provider gateways, tool table, client pool, optional
//! classifiers and the conversation store. Everything here runs once; the
//! resulting [`AppContext`] hands out use cases.

use crate::catalog::{CatalogLoadError, load_catalog};
use crate::config::{ConfigIssue, FileConfig, FileModelsConfig, StorageBackend};
use crate::providers::{
    AnthropicAdapter, LoggingGateway, OpenAiAdapter, ProviderAdapter, RoutingGateway,
};
use crate::storage::{FileStore, MemoryStore};
use crate::tools::default_tool_registry;
use parley_application::{
    AgentClientFactory, ClientPool, ConversationServices, ConversationStore, GatewayError,
    GetConversationUseCase, KeyValueStore, ListModelsUseCase, LlmGateway, ModelClassifier,
    SendMessageUseCase, StoreError, ToolClassifier, ToolRegistry, UpdateStatusUseCase,
};
use parley_domain::{
    DomainError, FastModelOverrides, ModelCatalog, ModelRegistry, ModelRoute, ModelSpec, Vendor,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const TOOL_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Invalid configuration: {}", join_issues(.0))]
    InvalidConfig(Vec<ConfigIssue>),

    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Provider setup failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Storage setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Process-wide services plus the use cases built on them
pub struct AppContext {
    config: FileConfig,
    credentialed: Vec<Vendor>,
    services: Arc<ConversationServices>,
    store: ConversationStore,
}

impl AppContext {
    /// Wire everything from configuration: catalog file, provider adapters
    /// for every vendor with a key, tools, and the configured storage backend.
    pub async fn build(config: FileConfig) -> Result<Self, BootstrapError> {
        let issues = config.validate();
        for issue in issues.iter().filter(|i| !i.is_error()) {
            warn!("{}", issue);
        }
        let errors: Vec<ConfigIssue> = issues.into_iter().filter(|i| i.is_error()).collect();
        if !errors.is_empty() {
            return Err(BootstrapError::InvalidConfig(errors));
        }

        let catalog = Arc::new(load_catalog(config.catalog.path.as_deref())?);

        let mut adapters: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
        if let Some(key) = config.providers.anthropic.resolve_api_key() {
            adapters.push(Arc::new(AnthropicAdapter::new(
                key,
                &config.providers.anthropic,
            )?));
        }
        if let Some(key) = config.providers.openai.resolve_api_key() {
            adapters.push(Arc::new(OpenAiAdapter::new(key, &config.providers.openai)?));
        }
        let routing = RoutingGateway::new(adapters);
        let credentialed = routing.vendors();
        if credentialed.is_empty() {
            warn!(
                "No provider API key found ({} / {}); requests will fail",
                config.providers.anthropic.api_key_env, config.providers.openai.api_key_env
            );
        }
        let gateway: Arc<dyn LlmGateway> = Arc::new(LoggingGateway::new(Arc::new(routing)));

        let kv = open_store(&config).await?;

        let http = reqwest::Client::builder()
            .timeout(TOOL_HTTP_TIMEOUT)
            .build()?;
        let tools = default_tool_registry(&config.tools, &http);

        Self::assemble(config, catalog, credentialed, gateway, kv, tools)
    }

    /// Wire the application layer from already-built adapters.
    pub fn assemble(
        config: FileConfig,
        catalog: Arc<ModelCatalog>,
        credentialed: Vec<Vendor>,
        gateway: Arc<dyn LlmGateway>,
        kv: Arc<dyn KeyValueStore>,
        tools: ToolRegistry,
    ) -> Result<Self, BootstrapError> {
        let registry = Arc::new(build_registry(&config.models, catalog, &credentialed)?);
        info!(
            default = %registry.default_spec().identifier(),
            models = registry.available().len(),
            "Model registry ready"
        );

        let tools = Arc::new(tools);
        let factory = Arc::new(AgentClientFactory::new(
            Arc::clone(&gateway),
            config.agent.to_execution_params(),
        ));
        let pool = Arc::new(ClientPool::new(
            Arc::clone(&registry),
            Arc::clone(&tools),
            factory,
        ));

        let mut services = ConversationServices::new(Arc::clone(&registry), pool);
        let classifier_spec = classifier_spec(&config.models, &registry)?;

        if config.routing.model_routing {
            let routes = allowed_routes(&config.models, &registry);
            if routes.is_empty() {
                warn!("No allow-listed routes; model routing disabled");
            } else {
                let classifier = ModelClassifier::new(
                    classifier_spec.clone(),
                    Arc::clone(&registry),
                    routes,
                    Arc::clone(&gateway),
                )?;
                info!(
                    classifier = %classifier_spec.identifier(),
                    routes = ?classifier.routes().iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "Model routing enabled"
                );
                services = services.with_model_classifier(Arc::new(classifier));
            }
        }

        if config.routing.tool_routing && !tools.is_empty() {
            let classifier = ToolClassifier::new(
                classifier_spec.clone(),
                &registry,
                Arc::clone(&tools),
                Arc::clone(&gateway),
            )?;
            info!(classifier = %classifier_spec.identifier(), "Tool routing enabled");
            services = services.with_tool_classifier(Arc::new(classifier));
        }

        Ok(Self {
            config,
            credentialed,
            services: Arc::new(services),
            store: ConversationStore::new(kv),
        })
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    /// Vendors with a configured API key
    pub fn credentialed(&self) -> &[Vendor] {
        &self.credentialed
    }

    pub fn services(&self) -> &Arc<ConversationServices> {
        &self.services
    }

    pub fn send_message(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(Arc::clone(&self.services), self.store.clone())
    }

    pub fn get_conversation(&self) -> GetConversationUseCase {
        GetConversationUseCase::new(self.store.clone())
    }

    pub fn list_models(&self) -> ListModelsUseCase {
        ListModelsUseCase::new(Arc::clone(self.services.registry()))
    }

    pub fn update_status(&self) -> UpdateStatusUseCase {
        UpdateStatusUseCase::new(self.store.clone())
    }
}

async fn open_store(config: &FileConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    let (backend, _) = config.storage.parse_backend();
    Ok(match backend {
        StorageBackend::Memory => {
            debug!("Using in-memory conversation store");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::File => {
            let store = FileStore::open(config.storage.resolve_dir()).await?;
            debug!("Using file conversation store at {}", store.dir().display());
            Arc::new(store)
        }
    })
}

/// Allow-list and default model.
///
/// Unset values are derived from the credentialed vendors: every model they
/// offer, and the catalog's preferred default among them. With no credentials
/// at all, the whole catalog is allowed.
fn build_registry(
    models: &FileModelsConfig,
    catalog: Arc<ModelCatalog>,
    credentialed: &[Vendor],
) -> Result<ModelRegistry, DomainError> {
    let allowed: Vec<ModelSpec> = if models.allowed.is_empty() {
        let vendors: Vec<Vendor> = if credentialed.is_empty() {
            catalog.vendors().map(|v| v.vendor()).collect()
        } else {
            credentialed.to_vec()
        };
        vendors
            .into_iter()
            .flat_map(|vendor| catalog.specs_for(vendor))
            .collect()
    } else {
        models
            .allowed
            .iter()
            .map(|id| catalog.parse_spec(id))
            .collect::<Result<_, _>>()?
    };

    let default = match &models.default {
        Some(id) => catalog.parse_spec(id)?,
        None => catalog.preferred_default(credentialed)?,
    };

    ModelRegistry::from_specs(catalog, default, allowed)
}

/// Fast model used by both classifiers.
///
/// Explicit `models.classifier`, else the configured fast companion of the
/// default model, else the catalog's fast variant for the default's vendor,
/// else the default model itself.
fn classifier_spec(
    models: &FileModelsConfig,
    registry: &ModelRegistry,
) -> Result<ModelSpec, DomainError> {
    let catalog = registry.catalog();
    if let Some(id) = &models.classifier {
        return catalog.parse_spec(id);
    }

    let default = registry.default_spec();
    let overrides = FastModelOverrides::from_identifiers(
        models
            .fast_overrides
            .iter()
            .map(|(primary, fast)| (primary.as_str(), fast.as_str())),
        catalog,
    )?;

    Ok(overrides
        .for_spec(default)
        .cloned()
        .or_else(|| catalog.fast_spec(default.vendor))
        .unwrap_or_else(|| default.clone()))
}

/// Configured routes that resolve to an allow-listed model
fn allowed_routes(models: &FileModelsConfig, registry: &ModelRegistry) -> Vec<ModelRoute> {
    models
        .routes
        .iter()
        .filter(|id| match registry.resolve_identifier(id) {
            Ok(_) => true,
            Err(e) => {
                debug!("Dropping route {}: {}", id, e);
                false
            }
        })
        .map(ModelRoute::new)
        .collect()
}
