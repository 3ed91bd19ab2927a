//! API error taxonomy and HTTP response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pano3d_io::ModelFormat;
use serde_json::{json, Value};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Every failure surfaced by the proxy.
///
/// Local errors (bad input, bad format) respond immediately with 4xx;
/// upstream failures relay the remote status code and body verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Unsupported content type")]
    UnsupportedMediaType,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Service misconfigured: {0}")]
    Configuration(String),

    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        detail: Value,
    },

    #[error("{message}")]
    Protocol { message: String, detail: Value },

    #[error("Job not completed")]
    JobNotReady { status: Option<String> },

    #[error("Conversion to {format} failed")]
    Conversion { format: String, detail: String },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                json!({ "error": "Unsupported content type" }),
            ),
            ApiError::UnsupportedFormat(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Unsupported format", "allowed": ModelFormat::ALLOWED }),
            ),
            ApiError::Configuration(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
            ApiError::Upstream {
                status,
                message,
                detail,
            } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                json!({ "error": message, "detail": detail }),
            ),
            ApiError::Protocol { message, detail } => {
                let body = if detail.is_null() {
                    json!({ "error": message })
                } else {
                    json!({ "error": message, "detail": detail })
                };
                (StatusCode::BAD_GATEWAY, body)
            }
            ApiError::JobNotReady { status } => (
                StatusCode::CONFLICT,
                json!({ "error": "Job not completed", "status": status }),
            ),
            ApiError::Conversion { format, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("Conversion to {} failed", format), "detail": detail }),
            ),
            ApiError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error", "detail": e.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
