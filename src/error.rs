use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Backend unavailable ({target}): {reason}")]
    BackendUnavailable { target: String, reason: String },

    #[error("Proxy upstream error: {0}")]
    ProxyUpstream(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn unavailable(target: impl Into<String>, reason: impl ToString) -> Self {
        Self::BackendUnavailable {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::ProxyUpstream(ref msg) => {
                tracing::error!("Proxy upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream backend unreachable")
            }
            Self::HttpRequest(ref e) => {
                tracing::error!("HTTP request error: {}", e);
                (StatusCode::BAD_GATEWAY, "Upstream request failed")
            }
            Self::BackendUnavailable { ref target, .. } => {
                tracing::error!("Backend unavailable: {}", target);
                (StatusCode::BAD_GATEWAY, "Backend unavailable")
            }
            Self::UnknownScenario(ref name) => {
                tracing::warn!("Unknown scenario requested: {}", name);
                (StatusCode::NOT_FOUND, "Unknown scenario")
            }
            Self::InvalidParameters(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            Self::Serialization(ref e) => {
                tracing::error!("Serialization error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Data processing error")
            }
            Self::Io(ref e) => {
                tracing::error!("I/O error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "I/O error")
            }
            Self::Watch(ref e) => {
                tracing::error!("File watch error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "File watch error")
            }
            Self::Configuration(ref msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.as_str()),
            Self::Other(ref e) => {
                tracing::error!("Unexpected error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
