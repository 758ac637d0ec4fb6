// Error types for medcot
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagnosisError {
    #[error("Image decoding failed: {0}")]
    Decoding(String),

    #[error("Image encoding failed: {0}")]
    Encoding(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Missing API credential for {0}")]
    MissingCredential(String),

    #[error("Provider returned HTTP {status} {status_text}: {body}")]
    Provider {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("A diagnosis is already in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse grouping used for rendering and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Decoding,
    Encoding,
    Network,
    Auth,
    Provider,
    Busy,
    Internal,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Decoding => "decoding",
            ErrorClass::Encoding => "encoding",
            ErrorClass::Network => "network",
            ErrorClass::Auth => "auth",
            ErrorClass::Provider => "provider",
            ErrorClass::Busy => "busy",
            ErrorClass::Internal => "internal",
        }
    }
}

impl DiagnosisError {
    pub fn class(&self) -> ErrorClass {
        match self {
            DiagnosisError::Decoding(_) => ErrorClass::Decoding,
            DiagnosisError::Encoding(_) => ErrorClass::Encoding,
            DiagnosisError::Network(_) => ErrorClass::Network,
            DiagnosisError::MissingCredential(_) => ErrorClass::Auth,
            DiagnosisError::Provider { .. } => ErrorClass::Provider,
            DiagnosisError::Busy => ErrorClass::Busy,
            _ => ErrorClass::Internal,
        }
    }
}

// Convert DiagnosisError to HTTP responses for Axum
impl IntoResponse for DiagnosisError {
    fn into_response(self) -> Response {
        let status = match self.class() {
            ErrorClass::Decoding => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorClass::Encoding => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorClass::Network | ErrorClass::Provider => StatusCode::BAD_GATEWAY,
            ErrorClass::Auth => StatusCode::UNAUTHORIZED,
            ErrorClass::Busy => StatusCode::CONFLICT,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // The rendered summary is what the page would have shown.
        let body = json!({
            "type": "error",
            "error": {
                "type": self.class().as_str(),
                "message": self.to_string(),
            },
            "summary": crate::diagnosis::render_error(&self),
            "reasoning": "",
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DiagnosisError>;
