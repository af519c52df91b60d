//! Application error type and its HTTP mapping.
//!
//! Every variant carries a human-readable message plus structured `details`
//! that are returned to the client inside a uniform JSON envelope:
//!
//! ```json
//! { "error": { "code": "invalid_url", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::base62::CodeError;
use crate::utils::url_normalizer::UrlNormalizationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input is not an absolute http(s) URL.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// Requested expiry is not after the creation time.
    #[error("{message}")]
    InvalidExpiry { message: String, details: Value },

    /// Short code contains symbols outside the base62 alphabet.
    #[error("{message}")]
    InvalidCode { message: String, details: Value },

    /// The short code is unknown or the link has expired.
    #[error("{message}")]
    LinkUnavailable { message: String, details: Value },

    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unique constraint violation. Resolved inside the link service.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_expiry(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidExpiry {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_code(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidCode {
            message: message.into(),
            details,
        }
    }

    pub fn link_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::LinkUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. }
            | Self::InvalidExpiry { .. }
            | Self::InvalidCode { .. }
            | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::LinkUnavailable { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidExpiry { .. } => "invalid_expiry",
            Self::InvalidCode { .. } => "invalid_code",
            Self::LinkUnavailable { .. } => "link_unavailable",
            Self::Validation { .. } => "validation_error",
            Self::Conflict { .. } => "conflict",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::InvalidUrl { message, details }
            | Self::InvalidExpiry { message, details }
            | Self::InvalidCode { message, details }
            | Self::LinkUnavailable { message, details }
            | Self::Validation { message, details }
            | Self::Conflict { message, details }
            | Self::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!("Database error: {}", e);
        AppError::internal("Database error", json!({}))
    }
}

impl From<UrlNormalizationError> for AppError {
    fn from(e: UrlNormalizationError) -> Self {
        AppError::invalid_url("Invalid URL", json!({ "reason": e.to_string() }))
    }
}

impl From<CodeError> for AppError {
    fn from(e: CodeError) -> Self {
        AppError::invalid_code("Invalid short code", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}
