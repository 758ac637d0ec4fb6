// OpenAI chat-completions backend
// Author: kelexine (https://github.com/kelexine)

use super::client::post_chat_completion;
use super::models::ChatCompletionRequest;
use super::{ProviderKind, VisionProvider};
use crate::config::OpenAiConfig;
use crate::error::{DiagnosisError, Result};
use crate::vision::NormalizedImage;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;
use zeroize::Zeroizing;

/// Sends images to `gpt-4o` through the public chat-completions endpoint.
pub struct OpenAiProvider {
    http_client: Client,
    endpoint: String,
    model: String,
    max_tokens: Option<u32>,
    prompt: String,
    api_key: Option<Zeroizing<String>>,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig, http_client: Client) -> Self {
        Self {
            http_client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            prompt: config.prompt.clone(),
            api_key: config.api_key.clone().map(Zeroizing::new),
        }
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send(&self, image: &NormalizedImage, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            DiagnosisError::MissingCredential(format!(
                "{} (set {})",
                self.kind(),
                self.kind().credential_env()
            ))
        })?;

        let request = ChatCompletionRequest::with_image(
            &self.model,
            prompt,
            image.to_data_url(),
            self.max_tokens,
        );

        info!(
            "Sending {} ({}x{}, {} bytes) to {}",
            image.name,
            image.width,
            image.height,
            image.data.len(),
            self.model
        );

        let response = post_chat_completion(
            &self.http_client,
            self.kind(),
            &self.endpoint,
            api_key.as_str(),
            &request,
        )
        .await?;

        Ok(response.content())
    }
}
