use super::ProviderAdapter;
use async_trait::async_trait;
use parley_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use parley_domain::{ModelResponse, Vendor};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Gateway that dispatches each request to the adapter for its vendor.
///
/// Vendors without credentials have no adapter; requests for them fail with
/// [`GatewayError::ModelNotAvailable`] instead of reaching the network.
pub struct RoutingGateway {
    providers: BTreeMap<Vendor, Arc<dyn ProviderAdapter>>,
}

impl RoutingGateway {
    /// Later adapters for the same vendor replace earlier ones.
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self {
            providers: providers.into_iter().map(|p| (p.vendor(), p)).collect(),
        }
    }

    pub fn vendors(&self) -> Vec<Vendor> {
        self.providers.keys().copied().collect()
    }

    fn resolve_provider(&self, vendor: Vendor) -> Result<&dyn ProviderAdapter, GatewayError> {
        self.providers
            .get(&vendor)
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                GatewayError::ModelNotAvailable(format!("No credentials configured for {}", vendor))
            })
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, GatewayError> {
        self.resolve_provider(request.vendor)?.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{ModelMessage, Usage};

    // -- Mock ProviderAdapter --------------------------------------------------

    struct MockProvider {
        vendor: Vendor,
        label: &'static str,
    }

    impl MockProvider {
        fn new(vendor: Vendor, label: &'static str) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self { vendor, label })
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockProvider {
        fn vendor(&self) -> Vendor {
            self.vendor
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<ModelResponse, GatewayError> {
            Ok(ModelResponse::text(
                format!("{}:{}", self.label, request.model),
                Usage::default(),
            ))
        }
    }

    fn request(vendor: Vendor, model: &str) -> CompletionRequest {
        CompletionRequest::new(vendor, model, vec![ModelMessage::user("hi")])
    }

    fn reply_text(response: ModelResponse) -> String {
        ModelMessage::from(response).text().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn routes_by_vendor() {
        let gw = RoutingGateway::new(vec![
            MockProvider::new(Vendor::Anthropic, "a"),
            MockProvider::new(Vendor::OpenAi, "o"),
        ]);

        let anthropic = gw.complete(&request(Vendor::Anthropic, "claude")).await.unwrap();
        assert_eq!(reply_text(anthropic), "a:claude");

        let openai = gw.complete(&request(Vendor::OpenAi, "gpt-5")).await.unwrap();
        assert_eq!(reply_text(openai), "o:gpt-5");
    }

    #[tokio::test]
    async fn missing_vendor_returns_model_not_available() {
        let gw = RoutingGateway::new(vec![MockProvider::new(Vendor::Anthropic, "a")]);

        let result = gw.complete(&request(Vendor::OpenAi, "gpt-5")).await;
        assert!(matches!(result, Err(GatewayError::ModelNotAvailable(_))));
    }

    #[tokio::test]
    async fn empty_gateway_rejects_everything() {
        let gw = RoutingGateway::new(vec![]);
        assert!(gw.vendors().is_empty());
        assert!(gw.complete(&request(Vendor::Anthropic, "m")).await.is_err());
    }

    #[tokio::test]
    async fn later_adapter_replaces_earlier() {
        let gw = RoutingGateway::new(vec![
            MockProvider::new(Vendor::OpenAi, "first"),
            MockProvider::new(Vendor::OpenAi, "second"),
        ]);
        assert_eq!(gw.vendors(), vec![Vendor::OpenAi]);

        let response = gw.complete(&request(Vendor::OpenAi, "m")).await.unwrap();
        assert_eq!(reply_text(response), "second:m");
    }
}
