//! Error types for snapfeed.

use async_graphql::ErrorExtensions;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown target kind: {0}")]
    UnknownTargetKind(String),

    #[error("Target not found: {kind} {id}")]
    TargetNotFound {
        /// Tag of the target kind that was looked up.
        kind: String,
        /// Identifier that had no record.
        id: i64,
    },

    #[error("Invalid target: {0}")]
    InvalidTarget(#[source] Box<AppError>),

    #[error("Invalid actor: {0}")]
    InvalidActor(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap an error raised while resolving an annotation's target.
    #[must_use]
    pub fn invalid_target(source: Self) -> Self {
        Self::InvalidTarget(Box::new(source))
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) | Self::TargetNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidTarget(source) => match source.status_code() {
                status if status.is_client_error() => status,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UnknownTargetKind(_)
            | Self::InvalidActor(_)
            | Self::BadRequest(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Storage(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    ///
    /// An `InvalidTarget` reports the code of the registry failure it wraps.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnknownTargetKind(_) => "UNKNOWN_TARGET_KIND",
            Self::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            Self::InvalidTarget(source) => match source.as_ref() {
                Self::UnknownTargetKind(_) | Self::TargetNotFound { .. } => source.error_code(),
                _ => "INVALID_TARGET",
            },
            Self::InvalidActor(_) => "INVALID_ACTOR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    fn log(&self) {
        let code = self.error_code();
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        self.log();

        let code = self.error_code();
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, e| e.set("code", code.to_string()))
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_target_reports_underlying_code() {
        let err = AppError::invalid_target(AppError::TargetNotFound {
            kind: "post".to_string(),
            id: 42,
        });
        assert_eq!(err.error_code(), "TARGET_NOT_FOUND");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = AppError::invalid_target(AppError::UnknownTargetKind("video".to_string()));
        assert_eq!(err.error_code(), "UNKNOWN_TARGET_KIND");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_target_generic_code() {
        let err = AppError::invalid_target(AppError::BadRequest("mismatch".to_string()));
        assert_eq!(err.error_code(), "INVALID_TARGET");
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::AuthenticationRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidActor("self".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert!(AppError::Database("down".to_string()).is_server_error());
        assert!(!AppError::Conflict("dup".to_string()).is_server_error());
    }

    #[test]
    fn test_graphql_extension_code() {
        let err = AppError::AuthenticationRequired.extend();
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(
            code,
            Some(async_graphql::Value::String(
                "AUTHENTICATION_REQUIRED".to_string()
            ))
        );
    }
}
