//! Owner profile handlers.
//!
//! `GET /api/me` returns the site owner's profile and `PUT /api/me` merges
//! fields into it, creating it on first use.

use axum::{
    Json,
    extract::{Extension, State},
};
use folio_persistence::core::DocumentStore;
use folio_persistence::types::Document;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::JsonDocument;
use crate::identity::VerifiedIdentity;
use crate::state::AppState;

/// Label used in profile error messages.
pub const PROFILE_LABEL: &str = "Profile";

/// Handler for reading the profile.
///
/// # Response
///
/// - `200 OK` - The profile document
/// - `404 Not Found` - No profile has been saved yet
pub async fn get_profile_handler<S>(
    State(state): State<AppState<S>>,
) -> RestResult<Json<Document>>
where
    S: DocumentStore + ?Sized,
{
    debug!("Processing profile read request");

    state
        .stores()
        .profile()
        .get()
        .await?
        .map(Json)
        .ok_or(RestError::ResourceNotFound {
            label: PROFILE_LABEL,
        })
}

/// Handler for updating the profile.
///
/// Requires a verified caller.
///
/// # Response
///
/// - `200 OK` - The profile document after the merge
/// - `400 Bad Request` - Body is not a JSON object
/// - `401 Unauthorized` - Missing or invalid token
pub async fn update_profile_handler<S>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<VerifiedIdentity>,
    JsonDocument(payload): JsonDocument,
) -> RestResult<Json<Document>>
where
    S: DocumentStore + ?Sized,
{
    debug!(caller = %caller, "Processing profile update request");

    let profile = state.stores().profile().update(payload).await?;

    info!(caller = %caller, "Updated profile");
    Ok(Json(profile))
}
