//! Shared HTTP plumbing for provider adapters

use parley_application::ports::llm_gateway::GatewayError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(format!("Connection failed: {}", e))
    } else {
        GatewayError::RequestFailed(format!("Request failed: {}", e))
    }
}

/// Both vendors report failures as `{"error": {"message": ...}}`; fall back
/// to the raw body when it is not shaped that way.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

pub(crate) fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    let message = error_message(body);
    match status.as_u16() {
        401 | 403 => GatewayError::AuthenticationFailed(message),
        404 => GatewayError::ModelNotAvailable(message),
        429 => GatewayError::RateLimited(message),
        400 | 422 => GatewayError::RequestFailed(format!("Invalid request: {}", message)),
        500..=599 => GatewayError::RequestFailed(format!("Server error ({}): {}", status, message)),
        _ => GatewayError::Other(format!("HTTP {}: {}", status, message)),
    }
}

/// POST `body` as JSON and return the response text of a 2xx reply
pub(crate) async fn post_json<T: serde::Serialize + ?Sized>(
    request: reqwest::RequestBuilder,
    body: &T,
) -> Result<String, GatewayError> {
    let response = request.json(body).send().await.map_err(map_send_error)?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| GatewayError::ConnectionError(format!("Failed to read response: {}", e)))?;

    if !status.is_success() {
        return Err(classify_status(status, &text));
    }
    Ok(text)
}
