//! Configuration data structures for medcot.
//!
//! This module defines the schema for the application settings: the local
//! HTTP service, both hosted vision providers, the image normalizer and
//! logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::diagnosis::prompts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Local HTTP service settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Hosted chat-completion API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Hosted inference router settings.
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,

    /// Image normalization bounds.
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Outbound HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the OpenAI chat-completions backend.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Full chat-completions endpoint URL.
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    /// Default: `gpt-4o`
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Default: `1000`
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,

    /// Bearer credential. Falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Instruction sent alongside the image.
    #[serde(default = "default_lecturer_prompt")]
    pub prompt: String,
}

/// Settings for the Hugging Face inference router backend.
#[derive(Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    /// Router base URL; the inference provider is appended as a path segment.
    #[serde(default = "default_router_base_url")]
    pub router_base_url: String,

    /// Inference provider the router forwards to. Default: `nebius`
    #[serde(default = "default_inference_provider")]
    pub inference_provider: String,

    /// Default: `llava-hf/llava-1.5-13b-hf`
    #[serde(default = "default_hf_model")]
    pub model: String,

    /// Not sent unless configured.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Bearer credential. Falls back to `HUGGINGFACE_API_KEY`, then `HF_TOKEN`.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_radiologist_prompt")]
    pub prompt: String,
}

/// Bounding box and quality for image normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Default: `1024`
    #[serde(default = "default_max_side")]
    pub max_width: u32,

    /// Default: `1024`
    #[serde(default = "default_max_side")]
    pub max_height: u32,

    /// JPEG quality in `1..=100`. Default: `70`
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

/// Settings for the outbound provider client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds. Default: `120`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Default: `10`
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Credentials never reach Debug output.
fn redacted(key: &Option<String>) -> &'static str {
    if key.is_some() {
        "[REDACTED]"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &redacted(&self.api_key))
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for HuggingFaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceConfig")
            .field("router_base_url", &self.router_base_url)
            .field("inference_provider", &self.inference_provider)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &redacted(&self.api_key))
            .finish_non_exhaustive()
    }
}

impl HuggingFaceConfig {
    /// Chat-completions URL for the configured inference provider.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/v1/chat/completions",
            self.router_base_url.trim_end_matches('/'),
            self.inference_provider
        )
    }
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_openai_endpoint(),
            model: default_openai_model(),
            max_tokens: default_max_tokens(),
            api_key: None,
            prompt: default_lecturer_prompt(),
        }
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            router_base_url: default_router_base_url(),
            inference_provider: default_inference_provider(),
            model: default_hf_model(),
            max_tokens: None,
            api_key: None,
            prompt: default_radiologist_prompt(),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_side(),
            max_height: default_max_side(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> Option<u32> {
    Some(1000)
}

fn default_lecturer_prompt() -> String {
    prompts::LECTURER.to_string()
}

fn default_router_base_url() -> String {
    "https://router.huggingface.co".to_string()
}

fn default_inference_provider() -> String {
    "nebius".to_string()
}

fn default_hf_model() -> String {
    "llava-hf/llava-1.5-13b-hf".to_string()
}

fn default_radiologist_prompt() -> String {
    prompts::RADIOLOGIST.to_string()
}

fn default_max_side() -> u32 {
    1024
}

fn default_jpeg_quality() -> u8 {
    70
}

fn default_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
