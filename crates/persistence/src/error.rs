//! Error types for the persistence layer.
//!
//! Errors are layered: backends report [`BackendError`], identifier
//! resolution reports [`IdentifierError`], and the resource store wraps
//! backend faults into a [`ResourceError`] that names the resource kind and
//! the operation that failed.
//!
//! A lookup that matches nothing is *not* an error anywhere in this crate.
//! Reads return `Ok(None)` and writes return zero counts.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

use crate::types::ResourceKind;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Identifier resolution errors
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Resource-level operation failures
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors raised while turning a caller-supplied identifier into a filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier has the canonical shape but could not be parsed.
    #[error("malformed canonical identifier '{value}': {message}")]
    MalformedCanonicalId { value: String, message: String },
}

/// The store operation that was running when a fault occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `list`, `get_by_identifier` or a profile read.
    Fetch,
    /// `create`.
    Create,
    /// `update_by_identifier` or a profile update.
    Update,
    /// `delete_by_identifier`.
    Delete,
    /// `initialize`.
    Initialize,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::Fetch => write!(f, "fetch"),
            StoreOperation::Create => write!(f, "create"),
            StoreOperation::Update => write!(f, "update"),
            StoreOperation::Delete => write!(f, "delete"),
            StoreOperation::Initialize => write!(f, "initialize"),
        }
    }
}

/// Resource-specific failures surfaced by the resource store.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A storage fault occurred while operating on a resource kind.
    ///
    /// The original backend message is carried verbatim in `message`.
    #[error("failed to {operation} {resource_kind}: {message}")]
    OperationFailed {
        resource_kind: ResourceKind,
        operation: StoreOperation,
        message: String,
        #[source]
        source: BackendError,
    },

    /// A storage fault occurred while reading or writing the owner profile.
    #[error("failed to {operation} profile: {message}")]
    ProfileOperationFailed {
        operation: StoreOperation,
        message: String,
        #[source]
        source: BackendError,
    },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Returns `true` if this error was caused by a malformed identifier
    /// rather than by the storage backend.
    pub fn is_identifier_error(&self) -> bool {
        matches!(self, StorageError::Identifier(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_failed_display() {
        let err = ResourceError::OperationFailed {
            resource_kind: ResourceKind::Cards,
            operation: StoreOperation::Fetch,
            message: "connection refused".to_string(),
            source: BackendError::QueryError {
                message: "connection refused".to_string(),
            },
        };
        assert_eq!(err.to_string(), "failed to fetch cards: connection refused");
    }

    #[test]
    fn test_identifier_error_display() {
        let err = IdentifierError::MalformedCanonicalId {
            value: "zz".to_string(),
            message: "invalid hex digit".to_string(),
        };
        assert!(err.to_string().contains("malformed canonical identifier 'zz'"));
    }

    #[test]
    fn test_storage_error_from_variants() {
        let err: StorageError = BackendError::MigrationError {
            message: "v2".to_string(),
        }
        .into();
        assert!(matches!(err, StorageError::Backend(_)));
        assert!(!err.is_identifier_error());

        let err: StorageError = IdentifierError::MalformedCanonicalId {
            value: "x".to_string(),
            message: "bad".to_string(),
        }
        .into();
        assert!(err.is_identifier_error());
    }

    #[test]
    fn test_store_operation_display() {
        assert_eq!(StoreOperation::Initialize.to_string(), "initialize");
        assert_eq!(StoreOperation::Delete.to_string(), "delete");
    }
}
