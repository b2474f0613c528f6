//! Public image listing.
//!
//! `GET /api/images` returns the portfolio image records. Uploading and
//! serving the binaries is handled outside this service.

use axum::{Json, extract::State};
use folio_persistence::core::DocumentStore;
use folio_persistence::types::{Document, ResourceKind};
use tracing::debug;

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for the public image listing.
pub async fn images_handler<S>(State(state): State<AppState<S>>) -> RestResult<Json<Vec<Document>>>
where
    S: DocumentStore + ?Sized,
{
    debug!("Processing image listing request");

    let images = state.store(ResourceKind::Portfolio).list().await?;
    Ok(Json(images))
}
