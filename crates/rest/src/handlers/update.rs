//! Update handler.
//!
//! `PUT /api/{kind}/{id}` merges the body into the addressed document. It is
//! a field merge, never a replace.

use axum::{
    Json,
    extract::{Extension, State},
};
use folio_persistence::core::DocumentStore;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::{JsonDocument, KindIdPath};
use crate::identity::VerifiedIdentity;
use crate::state::AppState;

/// Body of a successful update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    /// e.g. "Card updated successfully".
    pub message: String,
    /// 1 if stored content changed, 0 if the payload matched what was stored.
    pub modified_count: u64,
}

/// Handler for updating a document.
///
/// Requires a verified caller.
///
/// # Response
///
/// - `200 OK` - `{"message": "...", "modifiedCount": n}`
/// - `400 Bad Request` - Body is not a JSON object, or malformed identifier
/// - `401 Unauthorized` - Missing or invalid token
/// - `404 Not Found` - No document matches
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<VerifiedIdentity>,
    path: KindIdPath,
    JsonDocument(payload): JsonDocument,
) -> RestResult<Json<UpdatedResponse>>
where
    S: DocumentStore + ?Sized,
{
    let KindIdPath { kind, id } = path;
    debug!(
        resource_kind = %kind,
        id = %id,
        caller = %caller,
        "Processing update request"
    );

    let outcome = state.store(kind).update_by_identifier(&id, payload).await?;

    if !outcome.is_match() {
        return Err(RestError::ResourceNotFound {
            label: kind.display_name(),
        });
    }

    info!(
        resource_kind = %kind,
        id = %id,
        modified = outcome.modified,
        caller = %caller,
        "Updated resource"
    );
    Ok(Json(UpdatedResponse {
        message: format!("{} updated successfully", kind.display_name()),
        modified_count: outcome.modified,
    }))
}
