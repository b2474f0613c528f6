//! Read handler.
//!
//! `GET /api/{kind}/{id}` where `id` is either a canonical identifier or a
//! custom one.

use axum::{Json, extract::State};
use folio_persistence::core::DocumentStore;
use folio_persistence::types::Document;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::KindIdPath;
use crate::state::AppState;

/// Handler for reading one document.
///
/// # Response
///
/// - `200 OK` - The stored document
/// - `400 Bad Request` - Malformed canonical identifier
/// - `404 Not Found` - No document matches, e.g. `{"error": "Card not found"}`
///
/// # Example
///
/// ```http
/// GET /api/cards/42 HTTP/1.1
/// Host: folio.example.com
/// ```
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    path: KindIdPath,
) -> RestResult<Json<Document>>
where
    S: DocumentStore + ?Sized,
{
    let KindIdPath { kind, id } = path;
    debug!(resource_kind = %kind, id = %id, "Processing read request");

    state
        .store(kind)
        .get_by_identifier(&id)
        .await?
        .map(Json)
        .ok_or(RestError::ResourceNotFound {
            label: kind.display_name(),
        })
}
