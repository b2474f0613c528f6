//! The document store driver trait.
//!
//! This module defines [`DocumentStore`], the narrow interface every database
//! backend implements. It knows about collections, documents and
//! [`Filter`]s, and nothing about resource kinds, identifier classification or
//! timestamps; those belong to [`ResourceStore`](super::ResourceStore).

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::identifier::Filter;
use crate::types::{CanonicalId, DeleteOutcome, Document, UpdateOutcome};

use super::BackendKind;

/// A document database addressed by collection name.
///
/// All methods are single-document atomic at most. Returned documents carry
/// the canonical identifier under `_id` as a 24-character hex string.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use folio_persistence::backends::memory::MemoryBackend;
/// use folio_persistence::core::DocumentStore;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let store: Arc<dyn DocumentStore> = Arc::new(MemoryBackend::new());
/// let doc = json!({"name": "Ace"}).as_object().cloned().unwrap();
///
/// store.insert_one("cards", doc).await.unwrap();
/// assert_eq!(store.count_documents("cards").await.unwrap(), 1);
/// # });
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Returns the kind of backend.
    fn kind(&self) -> BackendKind;

    /// Checks if the backend is reachable and accepting requests.
    async fn health_check(&self) -> Result<(), BackendError>;

    /// Returns every document in the collection, in store-native order.
    async fn find(&self, collection: &str) -> Result<Vec<Document>, BackendError>;

    /// Returns the first document matching the filter.
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, BackendError>;

    /// Inserts a document and returns its freshly assigned canonical id.
    ///
    /// Any `_id` already present in `document` is ignored.
    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<CanonicalId, BackendError>;

    /// Merges `set` into the first document matching the filter.
    ///
    /// Fields absent from `set` are left untouched. An `_id` entry in `set` is
    /// ignored.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome, BackendError>;

    /// Removes the first document matching the filter.
    async fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteOutcome, BackendError>;

    /// Counts the documents in the collection.
    async fn count_documents(&self, collection: &str) -> Result<u64, BackendError>;
}
