//! The site owner's profile: a single document with no identifier in its
//! address.
//!
//! The profile lives in its own collection. Reads return the first document
//! found there; updates merge into that document, creating it on first use.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{BackendError, ResourceError, StorageError, StorageResult, StoreOperation};
use crate::identifier::Filter;
use crate::types::{
    CANONICAL_ID_FIELD, CREATED_AT_FIELD, CanonicalId, Document, UPDATED_AT_FIELD,
    canonical_id_of, format_timestamp, next_updated_at, strip_store_managed_fields,
};

use super::DocumentStore;

/// Collection holding the profile document.
pub const PROFILE_COLLECTION: &str = "me";

/// Read and merge-update access to the singleton profile document.
pub struct ProfileStore<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ProfileStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for ProfileStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("collection", &PROFILE_COLLECTION)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentStore + ?Sized> ProfileStore<S> {
    /// Creates a profile store over a shared handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the profile, or `None` before the first update.
    pub async fn get(&self) -> StorageResult<Option<Document>> {
        self.first().await.map_err(|e| fault(StoreOperation::Fetch, e))
    }

    /// Merges `payload` into the profile and returns the stored result.
    ///
    /// Store-managed fields in the payload are discarded. The first update
    /// creates the profile with both timestamps set; later ones refresh
    /// `updatedAt` only.
    pub async fn update(&self, mut payload: Document) -> StorageResult<Document> {
        let dropped = strip_store_managed_fields(&mut payload);
        if !dropped.is_empty() {
            debug!(fields = ?dropped, "Dropped store-managed fields from profile payload");
        }

        self.merge(payload).await.map_err(|e| fault(StoreOperation::Update, e))
    }

    async fn first(&self) -> Result<Option<Document>, BackendError> {
        Ok(self.store.find(PROFILE_COLLECTION).await?.into_iter().next())
    }

    async fn merge(&self, mut payload: Document) -> Result<Document, BackendError> {
        let filter = match self.first().await? {
            Some(existing) => {
                let updated_at = next_updated_at(existing.get(UPDATED_AT_FIELD), Utc::now());
                payload.insert(
                    UPDATED_AT_FIELD.to_string(),
                    Value::String(format_timestamp(updated_at)),
                );

                let filter = profile_filter(&existing)?;
                let outcome = self
                    .store
                    .update_one(PROFILE_COLLECTION, &filter, payload)
                    .await?;
                debug!(modified = outcome.modified, "Profile updated");
                filter
            }
            None => {
                let now = Value::String(format_timestamp(Utc::now()));
                payload.insert(CREATED_AT_FIELD.to_string(), now.clone());
                payload.insert(UPDATED_AT_FIELD.to_string(), now);

                let id = self.store.insert_one(PROFILE_COLLECTION, payload).await?;
                info!(id = %id, "Profile created");
                Filter::CanonicalId(id)
            }
        };

        self.store
            .find_one(PROFILE_COLLECTION, &filter)
            .await?
            .ok_or_else(|| BackendError::QueryError {
                message: "profile disappeared during update".to_string(),
            })
    }
}

/// Selects a stored profile by its `_id`, parsed or as stored.
fn profile_filter(existing: &Document) -> Result<Filter, BackendError> {
    let raw = canonical_id_of(existing).ok_or_else(|| BackendError::QueryError {
        message: "profile has no identifier".to_string(),
    })?;

    Ok(match CanonicalId::parse(raw) {
        Ok(id) => Filter::CanonicalId(id),
        Err(_) => Filter::field_equals(CANONICAL_ID_FIELD, raw),
    })
}

fn fault(operation: StoreOperation, source: BackendError) -> StorageError {
    let message = source.to_string();
    error!(
        resource_kind = "profile",
        operation = %operation,
        error = %message,
        "Storage operation failed"
    );
    ResourceError::ProfileOperationFailed {
        operation,
        message,
        source,
    }
    .into()
}
