//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Application errors, mapped onto HTTP responses by `IntoResponse`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("category resolves to no tag rules")]
    EmptyRuleSet,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("malformed geometry payload for {subject}")]
    Geometry {
        subject: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

/// JSON error body returned to callers.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingParameter(_)
            | AppError::UnknownCategory(_)
            | AppError::UnknownRegion(_)
            | AppError::EmptyRuleSet => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Geometry { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Store and serializer detail stays in the server log; callers get
        // a generic message.
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "store query failed");
                "internal server error".to_string()
            }
            AppError::Geometry { subject, source } => {
                tracing::error!(subject = %subject, error = %source, "malformed geometry payload");
                "internal server error".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            AppError::Configuration(reason) => {
                tracing::error!(reason = %reason, "service misconfigured");
                "service unavailable".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
