//! Timing and token logging around any gateway

use async_trait::async_trait;
use parley_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use parley_domain::ModelResponse;
use std::sync::Arc;
use std::time::Instant;

pub struct LoggingGateway {
    inner: Arc<dyn LlmGateway>,
}

impl LoggingGateway {
    pub fn new(inner: Arc<dyn LlmGateway>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmGateway for LoggingGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, GatewayError> {
        let start = Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    vendor = %request.vendor,
                    model = %request.model,
                    duration_ms = %duration.as_millis(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    tool_calls = response.tool_calls().count(),
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    vendor = %request.vendor,
                    model = %request.model,
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "LLM request failed"
                );
            }
        }

        result
    }
}
