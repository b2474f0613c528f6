//! In-memory document store.
//!
//! Keeps every collection in a `Vec` behind one lock, so insertion order is
//! the store-native order. Nothing is persisted. Used by tests and by
//! servers started with `--storage-backend memory`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::core::{BackendKind, DocumentStore};
use crate::error::BackendError;
use crate::identifier::Filter;
use crate::types::{CANONICAL_ID_FIELD, CanonicalId, DeleteOutcome, Document, UpdateOutcome};

const BACKEND_NAME: &str = "memory";

/// A [`DocumentStore`] backed by process memory.
#[derive(Debug)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    available: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Stores a document exactly as given, without assigning an `_id`.
    ///
    /// Lets tests seed legacy records, such as documents whose canonical
    /// slot holds a plain string.
    pub fn insert_raw(&self, collection: &str, document: Document) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Returns the number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Returns `true` if no collection holds any document.
    pub fn is_empty(&self) -> bool {
        self.collections.read().values().all(Vec::is_empty)
    }

    /// Simulates an outage: while unavailable, every operation fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), BackendError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::Unavailable {
                backend_name: BACKEND_NAME.to_string(),
                message: "store marked unavailable".to_string(),
            })
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.ensure_available()
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>, BackendError> {
        self.ensure_available()?;
        Ok(self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, BackendError> {
        self.ensure_available()?;
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<CanonicalId, BackendError> {
        self.ensure_available()?;

        let id = CanonicalId::generate();
        document.insert(CANONICAL_ID_FIELD.to_string(), Value::String(id.to_hex()));
        self.insert_raw(collection, document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome, BackendError> {
        self.ensure_available()?;

        let mut collections = self.collections.write();
        let Some(target) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)))
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut modified = false;
        for (field, value) in set {
            if field == CANONICAL_ID_FIELD {
                continue;
            }
            if target.get(&field) != Some(&value) {
                target.insert(field, value);
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteOutcome, BackendError> {
        self.ensure_available()?;

        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(DeleteOutcome::default());
        };

        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteOutcome { deleted: 1 })
            }
            None => Ok(DeleteOutcome::default()),
        }
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, BackendError> {
        self.ensure_available()?;
        Ok(self.len(collection) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_canonical_id() {
        let store = MemoryBackend::new();
        let id = store
            .insert_one("cards", doc(json!({"_id": "forged", "name": "Ace"})))
            .await
            .unwrap();

        let stored = store.find("cards").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["_id"], id.to_hex());
    }

    #[tokio::test]
    async fn test_update_merges_and_reports_modified() {
        let store = MemoryBackend::new();
        let id = store
            .insert_one("cards", doc(json!({"name": "Ace", "suit": "spades"})))
            .await
            .unwrap();
        let filter = Filter::CanonicalId(id);

        let outcome = store
            .update_one("cards", &filter, doc(json!({"name": "Ace"})))
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 0 });

        let outcome = store
            .update_one("cards", &filter, doc(json!({"name": "King", "_id": "x"})))
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

        let stored = store.find_one("cards", &filter).await.unwrap().unwrap();
        assert_eq!(stored["name"], "King");
        assert_eq!(stored["suit"], "spades");
        assert_eq!(stored["_id"], id.to_hex());
    }

    #[tokio::test]
    async fn test_delete_removes_first_match_only() {
        let store = MemoryBackend::new();
        store.insert_raw("cards", doc(json!({"id": 1, "n": "a"})));
        store.insert_raw("cards", doc(json!({"id": 1, "n": "b"})));

        let filter = Filter::field_equals("id", 1);
        let outcome = store.delete_one("cards", &filter).await.unwrap();
        assert_eq!(outcome.deleted, 1);

        let remaining = store.find("cards").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["n"], "b");
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let store = MemoryBackend::new();
        assert!(store.find("users").await.unwrap().is_empty());
        assert_eq!(store.count_documents("users").await.unwrap(), 0);
        let outcome = store
            .delete_one("users", &Filter::field_equals("id", "x"))
            .await
            .unwrap();
        assert_eq!(outcome.deleted, 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryBackend::new();
        store.set_available(false);
        assert!(matches!(
            store.health_check().await,
            Err(BackendError::Unavailable { .. })
        ));
        store.set_available(true);
        assert!(store.health_check().await.is_ok());
    }
}
