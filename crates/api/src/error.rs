//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
///
/// Every failure becomes a JSON `{"error": message}` body; there are
/// no partial-success payloads.
#[derive(Debug)]
pub enum ApiError {
    /// Missing, invalid or expired credentials.
    Unauthorized,
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication failed".to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        // Business-rule failures are client errors.
        DomainError::InvalidEmail(_)
        | DomainError::DuplicateEmail
        | DomainError::InvalidCredentials
        | DomainError::Auth(_)
        | DomainError::InvalidQuantity
        | DomainError::MissingShippingAddress
        | DomainError::EmptyCart
        | DomainError::CartNotFound
        | DomainError::ProductNotFound(_)
        | DomainError::InsufficientStock(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        DomainError::Store(_) => {
            tracing::error!(error = %err, "store error");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<store::StoreError> for ApiError {
    fn from(err: store::StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProductId;

    #[test]
    fn business_failures_map_to_400() {
        let (status, _) = domain_error_to_response(DomainError::EmptyCart);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, msg) =
            domain_error_to_response(DomainError::InsufficientStock(ProductId::new("prod1")));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("prod1"));
    }

    #[test]
    fn store_failures_map_to_500() {
        let err = DomainError::Store(store::StoreError::DuplicateKey {
            collection: "users",
            key: "x".to_string(),
        });
        let (status, _) = domain_error_to_response(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
