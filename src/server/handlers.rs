// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::diagnosis::{DiagnosisReport, SessionState};
use crate::error::Result;
use crate::providers::ProviderKind;
use crate::vision::SourceImage;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

/// Query string of `POST /v1/diagnose`.
#[derive(Debug, Default, Deserialize)]
pub struct DiagnoseParams {
    pub provider: Option<ProviderKind>,
}

/// Reports which providers can be called. Credentials are only checked for
/// presence; nothing is sent upstream.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();

    let providers = state.diagnoser.providers().all();
    let configured = providers.iter().filter(|p| p.has_credential()).count();

    for provider in &providers {
        let kind = provider.kind();
        let check = if provider.has_credential() {
            HealthCheck {
                status: "ok".to_string(),
                message: format!("Credential present, model {}", provider.model()),
            }
        } else {
            HealthCheck {
                status: "error".to_string(),
                message: format!("No credential; set {}", kind.credential_env()),
            }
        };
        checks.insert(format!("{}_credentials", kind), check);
    }

    let n = &state.config.normalizer;
    checks.insert(
        "normalizer".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!(
                "Max {}x{}, JPEG quality {}",
                n.max_width, n.max_height, n.jpeg_quality
            ),
        },
    );

    let status = match configured {
        0 => HealthStatus::Unhealthy,
        c if c < providers.len() => HealthStatus::Degraded,
        _ => HealthStatus::Healthy,
    };

    Json(HealthResponse {
        status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for `POST /v1/diagnose`: the body is the raw image file.
pub async fn diagnose_handler(
    State(state): State<AppState>,
    Query(params): Query<DiagnoseParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DiagnosisReport>> {
    let name = headers
        .get("x-file-name")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("upload")
        .to_string();

    let source = SourceImage::new(name, body);
    info!(
        "Received diagnose request: image={}, bytes={}, type={}, provider={:?}",
        source.name,
        source.data.len(),
        source.mime_type().unwrap_or("unknown"),
        params.provider
    );

    let report = state
        .diagnoser
        .diagnose(&state.session, source, params.provider)
        .await?;

    Ok(Json(report))
}

/// Handler for `GET /v1/diagnosis`: what the page currently shows.
pub async fn session_handler(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.session.snapshot())
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}
