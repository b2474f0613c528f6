//! The generic dual-identifier resource store.
//!
//! [`ResourceStore`] implements the CRUD contract shared by every resource
//! kind on top of any [`DocumentStore`]. It owns the rules that must hold for
//! all kinds alike:
//!
//! - identifiers are classified by shape and resolved through
//!   [`build_filter`];
//! - `_id`, `createdAt` and `updatedAt` are never taken from a payload;
//! - updates merge fields and refresh `updatedAt`;
//! - a lookup that matches nothing is a successful empty result;
//! - backend faults are logged and wrapped with the resource kind and the
//!   failing operation.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{BackendError, ResourceError, StorageError, StorageResult, StoreOperation};
use crate::identifier::{Filter, FilterPolicy, FilterPurpose, ResourceIdentifier, build_filter};
use crate::types::{
    CREATED_AT_FIELD, CanonicalId, DeleteOutcome, Document, ResourceKind, UPDATED_AT_FIELD,
    UpdateOutcome, canonical_id_of, format_timestamp, next_updated_at, strip_store_managed_fields,
};

use super::{DocumentStore, ProfileStore};

/// CRUD access to one resource kind.
///
/// The store handle is injected and shared; cloning a `ResourceStore` only
/// clones the `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use folio_persistence::backends::memory::MemoryBackend;
/// use folio_persistence::core::ResourceStore;
/// use folio_persistence::types::ResourceKind;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let cards = ResourceStore::new(Arc::new(MemoryBackend::new()), ResourceKind::Cards);
///
/// let payload = json!({"id": 42, "name": "Ace"}).as_object().cloned().unwrap();
/// let assigned = cards.create(payload).await.unwrap();
///
/// // Either identifier resolves the same document.
/// let by_canonical = cards.get_by_identifier(&assigned.to_hex()).await.unwrap();
/// let by_custom = cards.get_by_identifier("42").await.unwrap();
/// assert_eq!(by_canonical, by_custom);
/// # });
/// ```
pub struct ResourceStore<S: ?Sized> {
    store: Arc<S>,
    kind: ResourceKind,
    policy: FilterPolicy,
}

impl<S: ?Sized> Clone for ResourceStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            kind: self.kind,
            policy: self.policy,
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for ResourceStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("kind", &self.kind)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentStore + ?Sized> ResourceStore<S> {
    /// Creates a store for `kind` with the default filter policy.
    pub fn new(store: Arc<S>, kind: ResourceKind) -> Self {
        Self {
            store,
            kind,
            policy: FilterPolicy::default(),
        }
    }

    /// Replaces the filter policy.
    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the resource kind this store serves.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the active filter policy.
    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Returns the underlying document store.
    pub fn backend(&self) -> &Arc<S> {
        &self.store
    }

    fn collection(&self) -> &'static str {
        self.kind.collection_name()
    }

    /// Returns every document of this kind.
    pub async fn list(&self) -> StorageResult<Vec<Document>> {
        self.store
            .find(self.collection())
            .await
            .map_err(|e| self.fault(StoreOperation::Fetch, e))
    }

    /// Looks up one document by canonical or custom identifier.
    ///
    /// Returns `Ok(None)` when nothing matches.
    pub async fn get_by_identifier(&self, raw: &str) -> StorageResult<Option<Document>> {
        let filter = self.resolve(raw, FilterPurpose::Read)?;

        self.store
            .find_one(self.collection(), &filter)
            .await
            .map_err(|e| self.fault(StoreOperation::Fetch, e))
    }

    /// Inserts a new document and returns its canonical identifier.
    ///
    /// Store-managed fields in the payload are discarded. `createdAt` and
    /// `updatedAt` are both set to the current instant.
    pub async fn create(&self, mut payload: Document) -> StorageResult<CanonicalId> {
        let dropped = strip_store_managed_fields(&mut payload);
        if !dropped.is_empty() {
            debug!(
                resource_kind = %self.kind,
                fields = ?dropped,
                "Dropped store-managed fields from create payload"
            );
        }

        let now = Value::String(format_timestamp(Utc::now()));
        payload.insert(CREATED_AT_FIELD.to_string(), now.clone());
        payload.insert(UPDATED_AT_FIELD.to_string(), now);

        let id = self
            .store
            .insert_one(self.collection(), payload)
            .await
            .map_err(|e| self.fault(StoreOperation::Create, e))?;

        debug!(resource_kind = %self.kind, id = %id, "Created document");
        Ok(id)
    }

    /// Merges the payload into the document addressed by `raw`.
    ///
    /// `updatedAt` is refreshed to a value strictly later than the stored one;
    /// `_id` and `createdAt` are preserved even if the payload names them. A
    /// zero `matched` count means not found.
    pub async fn update_by_identifier(
        &self,
        raw: &str,
        mut payload: Document,
    ) -> StorageResult<UpdateOutcome> {
        let filter = self.resolve(raw, FilterPurpose::Write)?;

        let existing = self
            .store
            .find_one(self.collection(), &filter)
            .await
            .map_err(|e| self.fault(StoreOperation::Update, e))?;
        debug!(
            resource_kind = %self.kind,
            identifier = raw,
            existing = ?existing.as_ref().and_then(canonical_id_of),
            "Pre-update lookup"
        );

        let dropped = strip_store_managed_fields(&mut payload);
        if !dropped.is_empty() {
            debug!(
                resource_kind = %self.kind,
                fields = ?dropped,
                "Dropped store-managed fields from update payload"
            );
        }
        let updated_at = next_updated_at(
            existing.as_ref().and_then(|doc| doc.get(UPDATED_AT_FIELD)),
            Utc::now(),
        );
        payload.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::String(format_timestamp(updated_at)),
        );

        let outcome = self
            .store
            .update_one(self.collection(), &filter, payload)
            .await
            .map_err(|e| self.fault(StoreOperation::Update, e))?;

        debug!(
            resource_kind = %self.kind,
            identifier = raw,
            matched = outcome.matched,
            modified = outcome.modified,
            "Update finished"
        );
        Ok(outcome)
    }

    /// Removes at most one document addressed by `raw`.
    ///
    /// Deleting twice is harmless: the second call reports zero.
    pub async fn delete_by_identifier(&self, raw: &str) -> StorageResult<DeleteOutcome> {
        let filter = self.resolve(raw, FilterPurpose::Write)?;

        let outcome = self
            .store
            .delete_one(self.collection(), &filter)
            .await
            .map_err(|e| self.fault(StoreOperation::Delete, e))?;

        debug!(
            resource_kind = %self.kind,
            identifier = raw,
            deleted = outcome.deleted,
            "Delete finished"
        );
        Ok(outcome)
    }

    /// Counts existing documents and logs when the collection is empty.
    ///
    /// Never seeds data. Safe to call more than once.
    pub async fn initialize(&self) -> StorageResult<u64> {
        let count = self
            .store
            .count_documents(self.collection())
            .await
            .map_err(|e| self.fault(StoreOperation::Initialize, e))?;

        if count == 0 {
            info!(resource_kind = %self.kind, "Collection initialized (empty)");
        } else {
            debug!(resource_kind = %self.kind, count, "Collection already populated");
        }
        Ok(count)
    }

    fn resolve(&self, raw: &str, purpose: FilterPurpose) -> StorageResult<Filter> {
        let identifier = ResourceIdentifier::classify(raw);

        match build_filter(&identifier, purpose, &self.policy) {
            Ok(filter) => {
                debug!(
                    resource_kind = %self.kind,
                    identifier = %identifier,
                    purpose = ?purpose,
                    filter = ?filter,
                    "Resolved identifier"
                );
                Ok(filter)
            }
            Err(e) => {
                warn!(
                    resource_kind = %self.kind,
                    identifier = raw,
                    error = %e,
                    "Rejected identifier"
                );
                Err(e.into())
            }
        }
    }

    fn fault(&self, operation: StoreOperation, source: BackendError) -> StorageError {
        let message = source.to_string();
        error!(
            resource_kind = %self.kind,
            operation = %operation,
            error = %message,
            "Storage operation failed"
        );
        ResourceError::OperationFailed {
            resource_kind: self.kind,
            operation,
            message,
            source,
        }
        .into()
    }
}

/// One [`ResourceStore`] per [`ResourceKind`], all sharing a single handle.
pub struct ResourceStores<S: ?Sized> {
    store: Arc<S>,
    policy: FilterPolicy,
}

impl<S: ?Sized> Clone for ResourceStores<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for ResourceStores<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStores")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentStore + ?Sized> ResourceStores<S> {
    /// Creates the registry over a shared store handle.
    pub fn new(store: Arc<S>, policy: FilterPolicy) -> Self {
        Self { store, policy }
    }

    /// Returns the store for one resource kind.
    pub fn for_kind(&self, kind: ResourceKind) -> ResourceStore<S> {
        ResourceStore::new(Arc::clone(&self.store), kind).with_policy(self.policy)
    }

    /// Returns the profile store over the same handle.
    pub fn profile(&self) -> ProfileStore<S> {
        ProfileStore::new(Arc::clone(&self.store))
    }

    /// Returns the shared document store.
    pub fn backend(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the filter policy applied to every kind.
    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Runs [`ResourceStore::initialize`] for every kind, in bootstrap order.
    pub async fn initialize_all(&self) -> StorageResult<()> {
        for kind in ResourceKind::ALL {
            self.for_kind(kind).initialize().await?;
        }
        info!(backend = %self.store.kind(), "All resource collections initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::memory::MemoryBackend;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn cards() -> ResourceStore<MemoryBackend> {
        ResourceStore::new(Arc::new(MemoryBackend::new()), ResourceKind::Cards)
    }

    #[tokio::test]
    async fn test_create_sets_equal_timestamps() {
        let store = cards();
        let id = store.create(doc(json!({"name": "Ace"}))).await.unwrap();

        let stored = store.get_by_identifier(&id.to_hex()).await.unwrap().unwrap();
        assert_eq!(stored[CREATED_AT_FIELD], stored[UPDATED_AT_FIELD]);
        assert_eq!(canonical_id_of(&stored), Some(id.to_hex().as_str()));
    }

    #[tokio::test]
    async fn test_upper_case_canonical_lookup() {
        let store = cards();
        let id = store.create(doc(json!({"name": "Ace"}))).await.unwrap();

        let found = store
            .get_by_identifier(&id.to_hex().to_uppercase())
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = cards();
        assert!(store.get_by_identifier("nope").await.unwrap().is_none());
        assert!(
            store
                .get_by_identifier("507f1f77bcf86cd799439011")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_cannot_touch_created_at() {
        let store = cards();
        let id = store.create(doc(json!({"id": "ace"}))).await.unwrap();
        let before = store.get_by_identifier("ace").await.unwrap().unwrap();

        let outcome = store
            .update_by_identifier(
                "ace",
                doc(json!({"createdAt": "1970-01-01T00:00:00.000Z", "rank": 1})),
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched, 1);

        let after = store.get_by_identifier(&id.to_hex()).await.unwrap().unwrap();
        assert_eq!(after[CREATED_AT_FIELD], before[CREATED_AT_FIELD]);
        assert_eq!(after["rank"], 1);
    }

    #[tokio::test]
    async fn test_initialize_counts() {
        let store = cards();
        assert_eq!(store.initialize().await.unwrap(), 0);
        store.create(doc(json!({}))).await.unwrap();
        assert_eq!(store.initialize().await.unwrap(), 1);
        assert_eq!(store.initialize().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_backend_fault_is_wrapped() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_available(false);
        let store = ResourceStore::new(backend, ResourceKind::Categories);

        let err = store.list().await.unwrap_err();
        match err {
            StorageError::Resource(ResourceError::OperationFailed {
                resource_kind,
                operation,
                ref message,
                ..
            }) => {
                assert_eq!(resource_kind, ResourceKind::Categories);
                assert_eq!(operation, StoreOperation::Fetch);
                assert!(message.contains("memory"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_registry_shares_handle() {
        let backend = Arc::new(MemoryBackend::new());
        let stores = ResourceStores::new(Arc::clone(&backend), FilterPolicy::default());

        stores
            .for_kind(ResourceKind::Users)
            .create(doc(json!({"uid": "u1"})))
            .await
            .unwrap();

        assert_eq!(backend.len("users"), 1);
        assert_eq!(backend.len("cards"), 0);
        stores.initialize_all().await.unwrap();
    }
}
