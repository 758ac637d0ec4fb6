// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{diagnose_handler, health_handler, metrics_handler, session_handler};
use super::middleware::{request_id_layers, track_requests};
use crate::config::AppConfig;
use crate::diagnosis::{DiagnosisSession, Diagnoser};
use crate::error::Result;
use crate::vision::models::MAX_IMAGE_SIZE_BYTES;
use axum::extract::DefaultBodyLimit;
use axum::{middleware, routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub diagnoser: Arc<Diagnoser>,
    pub session: Arc<DiagnosisSession>,
}

pub fn create_router(config: AppConfig, diagnoser: Diagnoser) -> Result<Router> {
    let state = AppState {
        config,
        diagnoser: Arc::new(diagnoser),
        session: Arc::new(DiagnosisSession::default()),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/v1/diagnose", post(diagnose_handler))
        .route("/v1/diagnosis", get(session_handler))
        // Raw image bodies: the source size limit applies, not axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(tower_http::limit::RequestBodyLimitLayer::new(MAX_IMAGE_SIZE_BYTES))
        .route_layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
