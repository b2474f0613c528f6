//! Delete handler.
//!
//! `DELETE /api/{kind}/{id}` removes at most one document. Deletes are hard
//! deletes.

use axum::{
    Json,
    extract::{Extension, State},
};
use folio_persistence::core::DocumentStore;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::KindIdPath;
use crate::identity::VerifiedIdentity;
use crate::state::AppState;

/// Body of a successful delete.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    /// e.g. "Card deleted successfully".
    pub message: String,
    /// Always 1 on success.
    pub deleted_count: u64,
}

/// Handler for deleting a document.
///
/// Requires a verified caller. A second delete of the same identifier
/// answers 404.
///
/// # Response
///
/// - `200 OK` - `{"message": "...", "deletedCount": 1}`
/// - `401 Unauthorized` - Missing or invalid token
/// - `404 Not Found` - No document matches
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<VerifiedIdentity>,
    path: KindIdPath,
) -> RestResult<Json<DeletedResponse>>
where
    S: DocumentStore + ?Sized,
{
    let KindIdPath { kind, id } = path;
    debug!(
        resource_kind = %kind,
        id = %id,
        caller = %caller,
        "Processing delete request"
    );

    let outcome = state.store(kind).delete_by_identifier(&id).await?;

    if !outcome.is_match() {
        return Err(RestError::ResourceNotFound {
            label: kind.display_name(),
        });
    }

    info!(resource_kind = %kind, id = %id, caller = %caller, "Deleted resource");
    Ok(Json(DeletedResponse {
        message: format!("{} deleted successfully", kind.display_name()),
        deleted_count: outcome.deleted,
    }))
}
