// Shared chat-completions transport
// Author: kelexine (https://github.com/kelexine)

use super::models::{ChatCompletionRequest, ChatCompletionResponse};
use super::ProviderKind;
use crate::config::HttpConfig;
use crate::error::{DiagnosisError, Result};
use crate::utils::logging::sanitize;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Build the outbound HTTP client shared by both providers.
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .use_rustls_tls()
        .build()
        .map_err(|e| DiagnosisError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// POST `request` to `url` with a bearer credential.
///
/// Non-2xx responses become [`DiagnosisError::Provider`] with the body kept
/// verbatim; transport and parse failures become [`DiagnosisError::Network`].
/// No retries.
pub(crate) async fn post_chat_completion(
    client: &Client,
    kind: ProviderKind,
    url: &str,
    api_key: &str,
    request: &ChatCompletionRequest,
) -> Result<ChatCompletionResponse> {
    debug!("Calling {} chat completions at {} (model {})", kind, url, request.model);
    let start = Instant::now();

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await
        .map_err(|e| {
            crate::metrics::record_provider_call(kind.as_str(), 0, start.elapsed().as_secs_f64());
            error!("{} request failed: {}", kind, sanitize(&e.to_string()));
            DiagnosisError::Network(format!("HTTP error: {}", e))
        })?;

    let status = response.status();
    crate::metrics::record_provider_call(
        kind.as_str(),
        status.as_u16(),
        start.elapsed().as_secs_f64(),
    );

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(
            "{} API error: HTTP {} - Response body: {}",
            kind,
            status,
            sanitize(&body)
        );
        return Err(DiagnosisError::Provider {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        });
    }

    let response_text = response
        .text()
        .await
        .map_err(|e| DiagnosisError::Network(format!("Failed to read response body: {}", e)))?;

    debug!(
        "Raw {} response (first 500 chars): {}",
        kind,
        response_text.chars().take(500).collect::<String>()
    );

    serde_json::from_str(&response_text).map_err(|e| {
        error!("Failed to parse {} response: {}", kind, e);
        DiagnosisError::Network(format!("Response parsing error: {}", e))
    })
}
