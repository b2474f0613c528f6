//! List handler.
//!
//! `GET /api/{kind}` returns every document of the kind as a JSON array, in
//! the store's native order. There is no filtering or pagination.

use axum::{Json, extract::State};
use folio_persistence::core::DocumentStore;
use folio_persistence::types::Document;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::KindPath;
use crate::state::AppState;

/// Handler for listing a resource kind.
///
/// # Response
///
/// - `200 OK` - JSON array, possibly empty
/// - `404 Not Found` - Unknown resource kind
/// - `500 Internal Server Error` - Storage fault
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    KindPath(kind): KindPath,
) -> RestResult<Json<Vec<Document>>>
where
    S: DocumentStore + ?Sized,
{
    debug!(resource_kind = %kind, "Processing list request");

    let documents = state.store(kind).list().await?;

    debug!(resource_kind = %kind, count = documents.len(), "List completed");
    Ok(Json(documents))
}
