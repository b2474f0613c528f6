//! Axum extractors for Folio requests.
//!
//! - [`JsonDocument`] - Extract a JSON object payload
//! - [`KindPath`], [`KindIdPath`] - Resolve the resource kind path segment

mod json_document;
mod kind;

pub use json_document::{JsonDocument, JsonDocumentRejection};
pub use kind::{KindIdPath, KindPath, parse_kind};
