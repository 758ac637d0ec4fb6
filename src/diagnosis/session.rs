// Single-owner state for one user's upload-and-display cycle
// Author: kelexine (https://github.com/kelexine)

use super::response::DiagnosisResult;
use super::DiagnosisReport;
use crate::error::{DiagnosisError, Result};
use crate::providers::ProviderKind;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

/// Snapshot of what the page would display.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub provider: ProviderKind,
    pub loading: bool,
    pub summary: String,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_report: Option<DiagnosisReport>,
}

/// At most one cycle runs per session; a second trigger is rejected with
/// [`DiagnosisError::Busy`] instead of racing the first.
#[derive(Debug, Default)]
pub struct DiagnosisSession {
    state: Mutex<SessionState>,
}

impl DiagnosisSession {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            state: Mutex::new(SessionState {
                provider,
                ..Default::default()
            }),
        }
    }

    pub fn provider(&self) -> ProviderKind {
        self.state.lock().provider
    }

    pub fn select_provider(&self, provider: ProviderKind) {
        let mut state = self.state.lock();
        if state.provider != provider {
            debug!("Provider switched: {} -> {}", state.provider, provider);
            state.provider = provider;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// Mark a cycle as in flight. The returned guard must be finished with
    /// [`InFlight::complete`] or [`InFlight::fail`]; dropping it early only
    /// clears the loading flag.
    pub fn try_begin(&self) -> Result<InFlight<'_>> {
        let mut state = self.state.lock();
        if state.loading {
            warn!("Rejected diagnosis trigger: a cycle is already in flight");
            return Err(DiagnosisError::Busy);
        }
        state.loading = true;
        Ok(InFlight { session: self })
    }
}

/// Proof that the holder owns the session's current cycle.
#[must_use = "an in-flight cycle should be completed or failed"]
pub struct InFlight<'a> {
    session: &'a DiagnosisSession,
}

impl InFlight<'_> {
    /// Replace the displayed fields with a finished report.
    pub fn complete(self, report: &DiagnosisReport) {
        let mut state = self.session.state.lock();
        state.summary = report.result.summary.clone();
        state.reasoning = report.result.reasoning.clone();
        state.last_report = Some(report.clone());
    }

    /// Replace the displayed fields with the rendered failure.
    pub fn fail(self, err: &DiagnosisError) {
        let rendered = DiagnosisResult::from_error(err);
        let mut state = self.session.state.lock();
        state.summary = rendered.summary;
        state.reasoning = rendered.reasoning;
        state.last_report = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.state.lock().loading = false;
    }
}
