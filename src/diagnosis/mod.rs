//! Upload-and-diagnose pipeline.
//!
//! One cycle is a linear sequence of awaited stages, each returning a typed
//! result: normalize the source image, send it to the selected provider,
//! split the returned text into summary and reasoning. The session records
//! the outcome; every error ends the cycle without retry.
//!
//! # Submodules
//!
//! - `prompts`: Default instructions for each provider.
//! - `response`: Text splitting and user-visible rendering.
//! - `session`: Explicit single-owner state with in-flight rejection.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod prompts;
pub mod response;
pub mod session;

pub use response::{render_error, split_response, DiagnosisResult, EMPTY_CONTENT_PLACEHOLDER};
pub use session::{DiagnosisSession, InFlight, SessionState};

use crate::error::Result;
use crate::providers::{ProviderKind, ProviderSet};
use crate::vision::{NormalizedImage, Normalizer, SourceImage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// A finished cycle with the metadata shown alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub id: Uuid,
    pub provider: ProviderKind,
    pub provider_label: String,
    pub model: String,
    pub image_name: String,
    pub image_width: u32,
    pub image_height: u32,
    pub elapsed_secs: f64,
    pub completed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: DiagnosisResult,
}

/// Runs cycles against a fixed normalizer and provider set.
#[derive(Clone)]
pub struct Diagnoser {
    normalizer: Normalizer,
    providers: ProviderSet,
}

impl Diagnoser {
    pub fn new(normalizer: Normalizer, providers: ProviderSet) -> Self {
        Self {
            normalizer,
            providers,
        }
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Run one cycle for `source`. `provider` overrides the session's selection.
    pub async fn diagnose(
        &self,
        session: &DiagnosisSession,
        source: SourceImage,
        provider: Option<ProviderKind>,
    ) -> Result<DiagnosisReport> {
        self.diagnose_with(session, source, provider, |_| Ok(()))
            .await
    }

    /// Like [`Diagnoser::diagnose`], handing the normalized image to
    /// `on_normalized` before it is sent.
    pub async fn diagnose_with<F>(
        &self,
        session: &DiagnosisSession,
        source: SourceImage,
        provider: Option<ProviderKind>,
        on_normalized: F,
    ) -> Result<DiagnosisReport>
    where
        F: FnOnce(&NormalizedImage) -> Result<()> + Send,
    {
        let cycle = session.try_begin()?;
        if let Some(kind) = provider {
            session.select_provider(kind);
        }
        let kind = session.provider();

        match self.run(source, kind, on_normalized).await {
            Ok(report) => {
                info!(
                    "Diagnosis {} finished with {} in {:.1}s",
                    report.id, report.model, report.elapsed_secs
                );
                crate::metrics::record_diagnosis(kind.as_str(), "success");
                cycle.complete(&report);
                Ok(report)
            }
            Err(e) => {
                warn!("Diagnosis with {} failed: {}", kind, e);
                crate::metrics::record_diagnosis(kind.as_str(), e.class().as_str());
                cycle.fail(&e);
                Err(e)
            }
        }
    }

    async fn run<F>(
        &self,
        source: SourceImage,
        kind: ProviderKind,
        on_normalized: F,
    ) -> Result<DiagnosisReport>
    where
        F: FnOnce(&NormalizedImage) -> Result<()> + Send,
    {
        let start = Instant::now();
        let provider = self.providers.get(kind);

        let image = self.normalizer.normalize_blocking(source).await?;
        on_normalized(&image)?;

        let content = provider.send(&image, provider.prompt()).await?;

        let elapsed = start.elapsed();
        Ok(DiagnosisReport {
            id: Uuid::new_v4(),
            provider: kind,
            provider_label: kind.label().to_string(),
            model: provider.model().to_string(),
            image_name: image.name,
            image_width: image.width,
            image_height: image.height,
            elapsed_secs: elapsed.as_secs_f64(),
            completed_at: Utc::now(),
            result: DiagnosisResult::from_response(&content, elapsed),
        })
    }
}
