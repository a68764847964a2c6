//! LLM provider adapters
//!
//! Each adapter speaks one vendor's HTTP API. [`RoutingGateway`] picks the
//! adapter by the request's vendor and [`LoggingGateway`] wraps the whole
//! stack with timing and token logging.

pub mod anthropic;
mod http;
pub mod logging;
pub mod openai;
pub mod routing;

pub use anthropic::AnthropicAdapter;
pub use logging::LoggingGateway;
pub use openai::OpenAiAdapter;
pub use routing::RoutingGateway;

use async_trait::async_trait;
use parley_application::ports::llm_gateway::{CompletionRequest, GatewayError};
use parley_domain::{ModelResponse, Vendor};

/// One vendor's completion endpoint
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn vendor(&self) -> Vendor;

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, GatewayError>;
}
