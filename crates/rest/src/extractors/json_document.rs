//! JSON document extractor.
//!
//! Extracts a resource payload from the request body. The body must be a
//! JSON object; arrays, scalars and malformed JSON are rejected with 400.

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
    http::header,
    response::{IntoResponse, Response},
};
use folio_persistence::types::Document;
use serde_json::Value;

use crate::error::{RestError, error_body};

/// Axum extractor for a JSON object payload.
///
/// # Example
///
/// ```rust,ignore
/// use folio_rest::extractors::JsonDocument;
///
/// async fn create_handler(JsonDocument(payload): JsonDocument) {
///     println!("fields: {}", payload.len());
/// }
/// ```
#[derive(Debug)]
pub struct JsonDocument(pub Document);

impl JsonDocument {
    /// Consumes the extractor and returns the inner document.
    pub fn into_inner(self) -> Document {
        self.0
    }
}

/// Error type for payload extraction failures.
#[derive(Debug)]
pub enum JsonDocumentRejection {
    /// The body could not be read, e.g. it exceeds the size limit.
    Body(BytesRejection),
    /// The body is not valid JSON.
    InvalidJson(String),
    /// The body parsed, but is not an object.
    NotAnObject,
    /// Unsupported content type.
    UnsupportedMediaType(String),
}

impl IntoResponse for JsonDocumentRejection {
    fn into_response(self) -> Response {
        let error = match self {
            JsonDocumentRejection::Body(rejection) => {
                let status = rejection.status();
                return (status, Json(error_body(&rejection.body_text()))).into_response();
            }
            JsonDocumentRejection::InvalidJson(msg) => RestError::BadRequest {
                message: format!("Invalid JSON: {}", msg),
            },
            JsonDocumentRejection::NotAnObject => RestError::BadRequest {
                message: "Request body must be a JSON object".to_string(),
            },
            JsonDocumentRejection::UnsupportedMediaType(ct) => {
                RestError::UnsupportedMediaType { content_type: ct }
            }
        };
        error.into_response()
    }
}

impl<S> FromRequest<S> for JsonDocument
where
    S: Send + Sync,
{
    type Rejection = JsonDocumentRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Must own the string before moving req
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        if !content_type.contains("json") {
            return Err(JsonDocumentRejection::UnsupportedMediaType(content_type));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(JsonDocumentRejection::Body)?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(JsonDocument(map)),
            Ok(_) => Err(JsonDocumentRejection::NotAnObject),
            Err(e) => Err(JsonDocumentRejection::InvalidJson(e.to_string())),
        }
    }
}
