//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.
//!
//! Note the taxonomy from the domain: field validation errors and rejected
//! discount codes are *not* `AppError`s - they are recoverable UI states
//! carried in 2xx/422 response bodies by the checkout routes. `AppError`
//! covers lookups that miss, bad requests, and storage failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::shop::ShopError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shop operation failed.
    #[error("Shop error: {0}")]
    Shop(#[from] ShopError),

    /// Persistence failed outside a shop operation.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Shop(err) => match err {
                ShopError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                ShopError::EmptyCart => StatusCode::BAD_REQUEST,
                ShopError::Storage(_) | ShopError::Price(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn client_message(&self) -> String {
        // Don't expose internal error details to clients
        match self {
            Self::Storage(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Shop(err) => match err {
                ShopError::ProductNotFound(id) => format!("Product {id} not found"),
                ShopError::EmptyCart => "Your cart is empty".to_owned(),
                ShopError::Storage(_) | ShopError::Price(_) => "Internal server error".to_owned(),
            },
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.client_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mono_core::types::ProductId;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_owned());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_owned());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".to_owned()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("test".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("test".to_owned()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Shop(ShopError::ProductNotFound(ProductId::new(9))).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Shop(ShopError::EmptyCart).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = AppError::Internal("connection refused to 10.0.0.3".to_owned());
        assert_eq!(err.client_message(), "Internal server error");
    }
}
