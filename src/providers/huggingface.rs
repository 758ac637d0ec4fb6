// Hugging Face inference router backend
// Author: kelexine (https://github.com/kelexine)

use super::client::post_chat_completion;
use super::models::ChatCompletionRequest;
use super::{ProviderKind, VisionProvider};
use crate::config::HuggingFaceConfig;
use crate::error::{DiagnosisError, Result};
use crate::vision::NormalizedImage;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;
use zeroize::Zeroizing;

/// Sends images to a vision-language model hosted behind the Hugging Face
/// router. The router forwards to `inference_provider` and answers in the
/// chat-completions shape.
pub struct HuggingFaceProvider {
    http_client: Client,
    endpoint: String,
    inference_provider: String,
    model: String,
    max_tokens: Option<u32>,
    prompt: String,
    api_key: Option<Zeroizing<String>>,
}

impl HuggingFaceProvider {
    pub fn new(config: &HuggingFaceConfig, http_client: Client) -> Self {
        Self {
            http_client,
            endpoint: config.endpoint(),
            inference_provider: config.inference_provider.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            prompt: config.prompt.clone(),
            api_key: config.api_key.clone().map(Zeroizing::new),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl VisionProvider for HuggingFaceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
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
                "{} (set {} or HF_TOKEN)",
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
            "Sending {} ({}x{}, {} bytes) to {} via {}",
            image.name,
            image.width,
            image.height,
            image.data.len(),
            self.model,
            self.inference_provider
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
