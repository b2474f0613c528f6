//! Error types for the Folio REST API.
//!
//! This module defines all error types used throughout the REST API layer,
//! with automatic conversion to `{"error": "<message>"}` JSON responses.
//!
//! # Error Mapping
//!
//! Storage errors from the persistence layer are automatically mapped to
//! appropriate HTTP status codes:
//!
//! | Storage Error | HTTP Status |
//! |--------------|-------------|
//! | MalformedCanonicalId | 400 |
//! | OperationFailed | 500 |
//! | BackendError | 500 |
//!
//! A lookup that matches nothing is not a storage error; handlers turn it
//! into [`RestError::ResourceNotFound`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_persistence::error::{IdentifierError, StorageError};
use std::fmt;

/// The primary error type for REST API operations.
///
/// This enum provides semantic error types that map cleanly to HTTP status codes.
#[derive(Debug)]
pub enum RestError {
    /// No document of this kind matches the identifier (HTTP 404).
    ResourceNotFound {
        /// Singular label of the kind, e.g. "Card".
        label: &'static str,
    },

    /// The path names no known resource kind (HTTP 404).
    UnknownResourceKind {
        /// The path segment as received.
        kind: String,
    },

    /// Bad request - invalid body or identifier (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Unsupported media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Missing or rejected credentials (HTTP 401).
    ///
    /// The response body never reveals the reason.
    Unauthorized {
        /// Reason, for logs only.
        reason: String,
    },

    /// The store is not reachable (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::ResourceNotFound { label } => write!(f, "{} not found", label),
            RestError::UnknownResourceKind { kind } => {
                write!(f, "Unknown resource kind: {}", kind)
            }
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::Unauthorized { reason } => write!(f, "Unauthorized: {}", reason),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl RestError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::ResourceNotFound { .. } | RestError::UnknownResourceKind { .. } => {
                StatusCode::NOT_FOUND
            }
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            RestError::ResourceNotFound { label } => format!("{} not found", label),
            RestError::UnknownResourceKind { kind } => format!("Unknown resource kind: {}", kind),
            RestError::BadRequest { message } => message,
            RestError::UnsupportedMediaType { content_type } => {
                format!("Content type '{}' is not supported", content_type)
            }
            RestError::Unauthorized { .. } => "Unauthorized".to_string(),
            RestError::ServiceUnavailable { message } | RestError::InternalError { message } => {
                message
            }
        };

        (status, Json(error_body(&message))).into_response()
    }
}

/// Creates the JSON error body shared by every failure response.
pub fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Identifier(e) => e.into(),
            StorageError::Resource(_) | StorageError::Backend(_) => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<IdentifierError> for RestError {
    fn from(err: IdentifierError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_persistence::error::{BackendError, ResourceError, StoreOperation};
    use folio_persistence::types::ResourceKind;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::ResourceNotFound { label: "Card" }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RestError::Unauthorized {
                reason: "missing token".to_string()
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RestError::BadRequest {
                message: "x".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = RestError::ResourceNotFound { label: "Category" };
        assert_eq!(err.to_string(), "Category not found");
    }

    #[test]
    fn test_from_operation_failed() {
        let storage: StorageError = ResourceError::OperationFailed {
            resource_kind: ResourceKind::Cards,
            operation: StoreOperation::Update,
            message: "disk full".to_string(),
            source: BackendError::QueryError {
                message: "disk full".to_string(),
            },
        }
        .into();

        let err: RestError = storage.into();
        match err {
            RestError::InternalError { message } => {
                assert_eq!(message, "failed to update cards: disk full");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_from_identifier_error() {
        let storage: StorageError = IdentifierError::MalformedCanonicalId {
            value: "zz".to_string(),
            message: "bad".to_string(),
        }
        .into();

        let err: RestError = storage.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_body() {
        assert_eq!(
            error_body("Card not found"),
            serde_json::json!({"error": "Card not found"})
        );
    }
}
