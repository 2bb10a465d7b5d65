// Service Error type shared across handlers and services

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// Tier quota violation; carries the limit for user messaging
    #[error("Quota exceeded: limit is {0}")]
    QuotaExceeded(u32),

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Internal server error")]
    InternalError,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServiceError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::LimitExceeded(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::QuotaExceeded(limit) => (
                StatusCode::FORBIDDEN,
                format!(
                    "Free tier limited to {} active listings. Upgrade to add more.",
                    limit
                ),
            ),
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            ServiceError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServiceError::ProviderError(msg) => (StatusCode::BAD_GATEWAY, msg),
            ServiceError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

// Conversion from various error types
impl From<diesel::result::Error> for ServiceError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => ServiceError::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => ServiceError::Conflict(info.message().to_string()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => ServiceError::Conflict(info.message().to_string()),
            _ => ServiceError::DatabaseError(error.to_string()),
        }
    }
}

impl From<crate::services::slug::SlugError> for ServiceError {
    fn from(error: crate::services::slug::SlugError) -> Self {
        use crate::services::slug::SlugError;
        match error {
            SlugError::EmptyBase => ServiceError::ValidationError(
                "Address must contain at least one letter or digit".to_string(),
            ),
            SlugError::DatabaseError(e) => ServiceError::from(e),
            SlugError::PoolError(msg) => ServiceError::DatabaseError(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(error: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(error.to_string())
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for ServiceError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        ServiceError::DatabaseError(error.to_string())
    }
}

impl From<crate::models::user::UserError> for ServiceError {
    fn from(error: crate::models::user::UserError) -> Self {
        match error {
            crate::models::user::UserError::NotFound => ServiceError::NotFound,
            crate::models::user::UserError::DuplicateEmail => {
                ServiceError::Conflict("Email already registered".to_string())
            },
            crate::models::user::UserError::Database(e) => {
                ServiceError::DatabaseError(e.to_string())
            },
        }
    }
}

impl From<crate::services::image_host::ImageHostError> for ServiceError {
    fn from(error: crate::services::image_host::ImageHostError) -> Self {
        ServiceError::ProviderError(error.to_string())
    }
}

impl From<crate::services::video_host::VideoHostError> for ServiceError {
    fn from(error: crate::services::video_host::VideoHostError) -> Self {
        ServiceError::ProviderError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_message_carries_limit() {
        let err = ServiceError::QuotaExceeded(5);
        assert!(err.to_string().contains('5'));
    }
}
