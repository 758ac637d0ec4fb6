// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{DiagnosisError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (`MEDCOT_SECTION__KEY`)
    /// 2. Config file
    /// 3. Defaults (lowest)
    ///
    /// Provider credentials left unset are then filled from the conventional
    /// `OPENAI_API_KEY`, `HUGGINGFACE_API_KEY` and `HF_TOKEN` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Same as [`AppConfig::load`], reading `path` instead of the default file.
    /// An explicitly given file must exist.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(&Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            // Override with environment variables (prefix: MEDCOT_)
            .add_source(
                Environment::with_prefix("MEDCOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DiagnosisError::Config(e.to_string()))?;

        let mut loaded: Self = config
            .try_deserialize()
            .map_err(|e| DiagnosisError::Config(e.to_string()))?;

        loaded.fill_credentials_from_env(|name| std::env::var(name).ok());
        loaded.validate()?;
        Ok(loaded)
    }

    /// Fill missing credentials using `lookup` (normally the process environment).
    pub fn fill_credentials_from_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.openai.api_key.is_none() {
            self.openai.api_key = non_empty("OPENAI_API_KEY");
        }
        if self.huggingface.api_key.is_none() {
            self.huggingface.api_key =
                non_empty("HUGGINGFACE_API_KEY").or_else(|| non_empty("HF_TOKEN"));
        }

        debug!(
            openai = self.openai.api_key.is_some(),
            huggingface = self.huggingface.api_key.is_some(),
            "Resolved provider credentials"
        );
    }

    /// Reject bounds the normalizer cannot honor.
    pub fn validate(&self) -> Result<()> {
        let n = &self.normalizer;
        if n.max_width == 0 || n.max_height == 0 {
            return Err(DiagnosisError::Config(format!(
                "normalizer bounds must be positive, got {}x{}",
                n.max_width, n.max_height
            )));
        }
        if !(1..=100).contains(&n.jpeg_quality) {
            return Err(DiagnosisError::Config(format!(
                "normalizer.jpeg_quality must be within 1..=100, got {}",
                n.jpeg_quality
            )));
        }
        if self.http.timeout_seconds == 0 {
            return Err(DiagnosisError::Config(
                "http.timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".medcot")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
