//! Error types for the Prensa server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::render::RenderError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Render(e) => match e {
                RenderError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
                }
                RenderError::Timeout(secs) => (
                    StatusCode::GATEWAY_TIMEOUT,
                    "render_timeout",
                    format!("Render did not complete within {} seconds", secs),
                ),
                RenderError::Launch(msg) => {
                    tracing::error!("Engine launch failed: {}", msg);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "engine_unavailable",
                        "The render engine could not be started".to_string(),
                    )
                }
                RenderError::EngineCrash(msg) => {
                    tracing::error!("Engine crashed: {}", msg);
                    (
                        StatusCode::BAD_GATEWAY,
                        "engine_crashed",
                        "The render engine terminated unexpectedly".to_string(),
                    )
                }
                RenderError::Engine(msg) => {
                    tracing::error!("Render failed: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "render_failed",
                        "Rendering failed".to_string(),
                    )
                }
            },
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
