//! Resource kind path extractors.
//!
//! Routes are declared once as `/api/{kind}` and `/api/{kind}/{id}`; these
//! extractors turn the `kind` segment into a [`ResourceKind`] and answer
//! 404 for anything else.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use folio_persistence::types::ResourceKind;
use tracing::debug;

use crate::error::RestError;

/// Parses a path segment into a resource kind.
pub fn parse_kind(segment: &str) -> Result<ResourceKind, RestError> {
    segment.parse().map_err(|_| {
        debug!(kind = segment, "Unknown resource kind");
        RestError::UnknownResourceKind {
            kind: segment.to_string(),
        }
    })
}

fn bad_path(e: impl std::fmt::Display) -> RestError {
    RestError::BadRequest {
        message: format!("Invalid path: {}", e),
    }
}

/// Extracts `/{kind}`.
#[derive(Debug, Clone, Copy)]
pub struct KindPath(pub ResourceKind);

impl<S> FromRequestParts<S> for KindPath
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(bad_path)?;
        parse_kind(&segment).map(KindPath)
    }
}

/// Extracts `/{kind}/{id}`. The identifier is passed through unclassified.
#[derive(Debug, Clone)]
pub struct KindIdPath {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Raw identifier as received.
    pub id: String,
}

impl<S> FromRequestParts<S> for KindIdPath
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((segment, id)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(bad_path)?;
        Ok(KindIdPath {
            kind: parse_kind(&segment)?,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("cards").unwrap(), ResourceKind::Cards);
        assert_eq!(parse_kind("portfolio").unwrap(), ResourceKind::Portfolio);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = parse_kind("widgets").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Unknown resource kind: widgets");
    }
}
