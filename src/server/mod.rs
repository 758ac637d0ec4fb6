//! Axum-based HTTP service for medcot.
//!
//! Exposes the upload-and-diagnose workflow to a browser or script: upload an
//! image, pick a provider, read back the summary and reasoning. One session
//! is shared by the service, so concurrent uploads are rejected while a cycle
//! is in flight.
//!
//! # Components
//!
//! - `handlers`: Endpoint implementations (diagnose, session view, health, metrics).
//! - `middleware`: Request ID propagation and request metrics.
//! - `routes`: The router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{DiagnoseParams, HealthCheck, HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
