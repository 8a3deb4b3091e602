//! Error handling for the HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::DbError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid rating: {0} (expected 0-3)")]
    InvalidRating(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<quint_core::Error> for ApiError {
    fn from(err: quint_core::Error) -> Self {
        match err {
            quint_core::Error::Validation(message) => ApiError::Validation(message),
            quint_core::Error::InvalidRating(value) => ApiError::InvalidRating(value),
            quint_core::Error::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} {id}"))
            }
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::InvalidRating(_) => (StatusCode::BAD_REQUEST, "invalid_rating"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Database(DbError::CardNotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_status() {
        let error = ApiError::from(quint_core::Error::Validation("bad retention".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_rating_status() {
        let error = ApiError::from(quint_core::Error::InvalidRating(7));
        assert!(matches!(error, ApiError::InvalidRating(7)));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let error = ApiError::from(quint_core::Error::NotFound {
            entity: "card",
            id: 123,
        });
        assert_eq!(error.to_string(), "Not found: card 123");
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_card_in_database_is_not_found() {
        let error = ApiError::from(DbError::CardNotFound(5));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_status() {
        let error = ApiError::from(DbError::InvalidData("corrupt row".to_string()));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_status() {
        let error = ApiError::Internal("lock poisoned".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_invalid_rating() {
        let error = ApiError::InvalidRating(-1);
        assert_eq!(error.to_string(), "Invalid rating: -1 (expected 0-3)");
    }
}
