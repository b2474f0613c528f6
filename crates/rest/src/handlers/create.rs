//! Create handler.
//!
//! `POST /api/{kind}`. The store assigns the canonical identifier and both
//! timestamps; any `_id`, `createdAt` or `updatedAt` in the body is ignored.

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use folio_persistence::core::DocumentStore;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::RestResult;
use crate::extractors::{JsonDocument, KindPath};
use crate::identity::VerifiedIdentity;
use crate::state::AppState;

/// Body of a successful create.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    /// e.g. "Card created successfully".
    pub message: String,
    /// Hex form of the assigned canonical identifier.
    pub inserted_id: String,
}

/// Handler for creating a document.
///
/// Requires a verified caller.
///
/// # Response
///
/// - `201 Created` - `{"message": "...", "insertedId": "<hex>"}`
/// - `400 Bad Request` - Body is not a JSON object
/// - `401 Unauthorized` - Missing or invalid token
///
/// # Example
///
/// ```http
/// POST /api/cards HTTP/1.1
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {"id": 42, "name": "Ace"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<VerifiedIdentity>,
    KindPath(kind): KindPath,
    JsonDocument(payload): JsonDocument,
) -> RestResult<(StatusCode, Json<CreatedResponse>)>
where
    S: DocumentStore + ?Sized,
{
    debug!(
        resource_kind = %kind,
        caller = %caller,
        fields = payload.len(),
        "Processing create request"
    );

    let id = state.store(kind).create(payload).await?;

    info!(resource_kind = %kind, id = %id, caller = %caller, "Created resource");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: format!("{} created successfully", kind.display_name()),
            inserted_id: id.to_hex(),
        }),
    ))
}
