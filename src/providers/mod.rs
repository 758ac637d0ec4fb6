//! Hosted vision-language providers.
//!
//! Both backends accept the same text-prompt-plus-inline-image message and
//! answer with `choices[0].message.content`; they differ only in endpoint,
//! model and credential. Callers hold a `dyn VisionProvider` and never branch
//! on the backend.
//!
//! # Submodules
//!
//! - `models`: Chat-completions request/response wire types.
//! - `client`: Shared HTTP transport (client construction, POST, status mapping).
//! - `openai`: OpenAI chat-completions backend.
//! - `huggingface`: Hugging Face inference router backend.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod client;
pub mod huggingface;
pub mod models;
pub mod openai;

pub use client::build_http_client;
pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAiProvider;

use crate::config::AppConfig;
use crate::error::Result;
use crate::vision::NormalizedImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which hosted backend to send the image to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions (`gpt-4o`).
    #[serde(alias = "gpt4o")]
    #[value(name = "openai", alias = "gpt4o")]
    OpenAi,
    /// Hugging Face inference router (`llava-1.5-13b`).
    #[default]
    #[serde(alias = "llava", alias = "hf")]
    #[value(name = "huggingface", aliases = ["llava", "hf"])]
    HuggingFace,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    /// Label shown next to results.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "医学讲解助手",
            ProviderKind::HuggingFace => "智能诊断模型",
        }
    }

    /// Environment variable that conventionally carries the credential.
    pub fn credential_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::HuggingFace => "HUGGINGFACE_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability shared by all hosted backends: image + prompt in, text out.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent upstream.
    fn model(&self) -> &str;

    /// Instruction configured for this backend.
    fn prompt(&self) -> &str;

    /// Whether a credential is available. Checked again by `send`.
    fn has_credential(&self) -> bool;

    /// Send one image with `prompt` and return the generated text.
    ///
    /// An absent or empty completion yields `Ok(String::new())`.
    async fn send(&self, image: &NormalizedImage, prompt: &str) -> Result<String>;
}

/// One instance of each backend, sharing a single HTTP client.
#[derive(Clone)]
pub struct ProviderSet {
    openai: Arc<dyn VisionProvider>,
    huggingface: Arc<dyn VisionProvider>,
}

impl ProviderSet {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http_client = build_http_client(&config.http)?;
        Ok(Self {
            openai: Arc::new(OpenAiProvider::new(&config.openai, http_client.clone())),
            huggingface: Arc::new(HuggingFaceProvider::new(&config.huggingface, http_client)),
        })
    }

    pub fn new(openai: Arc<dyn VisionProvider>, huggingface: Arc<dyn VisionProvider>) -> Self {
        Self {
            openai,
            huggingface,
        }
    }

    pub fn get(&self, kind: ProviderKind) -> Arc<dyn VisionProvider> {
        match kind {
            ProviderKind::OpenAi => self.openai.clone(),
            ProviderKind::HuggingFace => self.huggingface.clone(),
        }
    }

    pub fn all(&self) -> [Arc<dyn VisionProvider>; 2] {
        [self.openai.clone(), self.huggingface.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parses_aliases() {
        let openai: ProviderKind = serde_json::from_str("\"gpt4o\"").unwrap();
        assert_eq!(openai, ProviderKind::OpenAi);
        let llava: ProviderKind = serde_json::from_str("\"llava\"").unwrap();
        assert_eq!(llava, ProviderKind::HuggingFace);
        let canonical: ProviderKind = serde_json::from_str("\"huggingface\"").unwrap();
        assert_eq!(canonical, ProviderKind::HuggingFace);
    }

    #[test]
    fn test_default_kind_is_router() {
        assert_eq!(ProviderKind::default(), ProviderKind::HuggingFace);
    }

    #[test]
    fn test_provider_set_selects_backend() {
        let set = ProviderSet::from_config(&AppConfig::default()).unwrap();
        assert_eq!(set.get(ProviderKind::OpenAi).kind(), ProviderKind::OpenAi);
        assert_eq!(set.get(ProviderKind::OpenAi).model(), "gpt-4o");
        assert_eq!(
            set.get(ProviderKind::HuggingFace).model(),
            "llava-hf/llava-1.5-13b-hf"
        );
    }
}
