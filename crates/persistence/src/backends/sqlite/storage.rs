//! DocumentStore implementation for SQLite.

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, params, params_from_iter};
use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use crate::core::{BackendKind, DocumentStore};
use crate::error::BackendError;
use crate::identifier::Filter;
use crate::types::{CANONICAL_ID_FIELD, CanonicalId, DeleteOutcome, Document, UpdateOutcome};

use super::SqliteBackend;
use super::filter::compile;

fn internal_error(message: String) -> BackendError {
    BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    }
}

fn query_error(message: String) -> BackendError {
    BackendError::QueryError { message }
}

fn serialization_error(message: String) -> BackendError {
    BackendError::SerializationError { message }
}

/// Bind values for `collection = ?` followed by the filter's own params.
fn bind(collection: &str, filter_params: Vec<SqlValue>) -> Vec<SqlValue> {
    let mut values = Vec::with_capacity(filter_params.len() + 1);
    values.push(SqlValue::Text(collection.to_string()));
    values.extend(filter_params);
    values
}

/// Splits the canonical id off a document and serializes the rest.
fn encode(document: &Document) -> Result<String, BackendError> {
    let mut body = document.clone();
    body.remove(CANONICAL_ID_FIELD);
    serde_json::to_string(&body)
        .map_err(|e| serialization_error(format!("Failed to serialize document: {}", e)))
}

/// Rebuilds a document from its `id` column and `data` text.
fn decode(id: String, data: &str) -> Result<Document, BackendError> {
    let mut document = match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(serialization_error(format!(
                "Stored document {} is not an object: {}",
                id, other
            )));
        }
        Err(e) => {
            return Err(serialization_error(format!(
                "Failed to deserialize document {}: {}",
                id, e
            )));
        }
    };
    document.insert(CANONICAL_ID_FIELD.to_string(), Value::String(id));
    Ok(document)
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

#[async_trait]
impl DocumentStore for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let conn = self
            .get_connection()
            .map_err(|_| BackendError::Unavailable {
                backend_name: "sqlite".to_string(),
                message: "Failed to get connection".to_string(),
            })?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| internal_error(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>, BackendError> {
        let conn = self.get_connection()?;

        let mut stmt = conn
            .prepare("SELECT id, data FROM documents WHERE collection = ?1 ORDER BY rowid")
            .map_err(|e| query_error(format!("Failed to prepare find: {}", e)))?;

        let rows = stmt
            .query_map(params![collection], read_row)
            .map_err(|e| query_error(format!("Failed to query documents: {}", e)))?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, data) =
                row.map_err(|e| query_error(format!("Failed to read document row: {}", e)))?;
            documents.push(decode(id, &data)?);
        }
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, BackendError> {
        let conn = self.get_connection()?;
        let sql = compile(filter);

        let query = format!(
            "SELECT id, data FROM documents WHERE collection = ? AND ({}) ORDER BY rowid LIMIT 1",
            sql.clause
        );
        let row = conn
            .query_row(&query, params_from_iter(bind(collection, sql.params)), read_row)
            .optional()
            .map_err(|e| query_error(format!("Failed to find document: {}", e)))?;

        row.map(|(id, data)| decode(id, &data)).transpose()
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<CanonicalId, BackendError> {
        let conn = self.get_connection()?;

        let id = CanonicalId::generate();
        let data = encode(&document)?;

        conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)",
            params![collection, id.to_hex(), data],
        )
        .map_err(|e| internal_error(format!("Failed to insert document: {}", e)))?;

        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome, BackendError> {
        let mut conn = self.get_connection()?;
        let sql = compile(filter);

        let tx = conn
            .transaction()
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        let query = format!(
            "SELECT rowid, data FROM documents WHERE collection = ? AND ({}) ORDER BY rowid LIMIT 1",
            sql.clause
        );
        let target: Option<(i64, String)> = tx
            .query_row(&query, params_from_iter(bind(collection, sql.params)), |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .map_err(|e| query_error(format!("Failed to find document to update: {}", e)))?;

        let Some((rowid, data)) = target else {
            return Ok(UpdateOutcome::default());
        };

        let mut stored: Document = serde_json::from_str(&data)
            .map_err(|e| serialization_error(format!("Failed to deserialize document: {}", e)))?;

        let mut modified = false;
        for (field, value) in set {
            if field == CANONICAL_ID_FIELD {
                continue;
            }
            if stored.get(&field) != Some(&value) {
                stored.insert(field, value);
                modified = true;
            }
        }

        if modified {
            tx.execute(
                "UPDATE documents SET data = ?1 WHERE rowid = ?2",
                params![encode(&stored)?, rowid],
            )
            .map_err(|e| internal_error(format!("Failed to update document: {}", e)))?;
        }

        tx.commit()
            .map_err(|e| internal_error(format!("Failed to commit update: {}", e)))?;

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
        let conn = self.get_connection()?;
        let sql = compile(filter);

        let statement = format!(
            "DELETE FROM documents WHERE rowid = (
                SELECT rowid FROM documents WHERE collection = ? AND ({}) ORDER BY rowid LIMIT 1
            )",
            sql.clause
        );
        let deleted = conn
            .execute(&statement, params_from_iter(bind(collection, sql.params)))
            .map_err(|e| internal_error(format!("Failed to delete document: {}", e)))?;

        Ok(DeleteOutcome {
            deleted: deleted as u64,
        })
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, BackendError> {
        let conn = self.get_connection()?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                params![collection],
                |row| row.get(0),
            )
            .map_err(|e| query_error(format!("Failed to count documents: {}", e)))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{FilterPolicy, FilterPurpose, custom_id_filter};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn backend() -> SqliteBackend {
        SqliteBackend::in_memory().unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find_preserves_order() {
        let store = backend();
        let first = store.insert_one("cards", doc(json!({"n": 1}))).await.unwrap();
        let second = store.insert_one("cards", doc(json!({"n": 2}))).await.unwrap();
        store.insert_one("categories", doc(json!({"n": 3}))).await.unwrap();

        let cards = store.find("cards").await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0]["_id"], first.to_hex());
        assert_eq!(cards[1]["_id"], second.to_hex());
        assert_eq!(store.count_documents("categories").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_forged_id_is_not_stored() {
        let store = backend();
        let id = store
            .insert_one("cards", doc(json!({"_id": "forged", "n": 1})))
            .await
            .unwrap();

        let found = store
            .find_one("cards", &Filter::CanonicalId(id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["_id"], id.to_hex());
    }

    #[tokio::test]
    async fn test_custom_id_type_semantics() {
        let store = backend();
        store.insert_one("cards", doc(json!({"id": 42, "kind": "int"}))).await.unwrap();
        store.insert_one("cards", doc(json!({"id": "7", "kind": "str"}))).await.unwrap();
        store.insert_one("cards", doc(json!({"id": "ace", "kind": "slug"}))).await.unwrap();

        let policy = FilterPolicy::default();
        let by = |raw: &str| custom_id_filter(raw, FilterPurpose::Read, &policy);

        let int = store.find_one("cards", &by("42")).await.unwrap().unwrap();
        assert_eq!(int["kind"], "int");
        let string = store.find_one("cards", &by("7")).await.unwrap().unwrap();
        assert_eq!(string["kind"], "str");
        let slug = store.find_one("cards", &by("ace")).await.unwrap().unwrap();
        assert_eq!(slug["kind"], "slug");

        // A string filter alone must not match an integer id.
        let strict = Filter::field_equals("id", "42");
        assert!(store.find_one("cards", &strict).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = backend();
        let id = store
            .insert_one("cards", doc(json!({"name": "Ace", "suit": "spades"})))
            .await
            .unwrap();
        let filter = Filter::CanonicalId(id);

        let unchanged = store
            .update_one("cards", &filter, doc(json!({"name": "Ace"})))
            .await
            .unwrap();
        assert_eq!(unchanged, UpdateOutcome { matched: 1, modified: 0 });

        let changed = store
            .update_one("cards", &filter, doc(json!({"name": "King", "_id": "x"})))
            .await
            .unwrap();
        assert_eq!(changed, UpdateOutcome { matched: 1, modified: 1 });

        let stored = store.find_one("cards", &filter).await.unwrap().unwrap();
        assert_eq!(stored["name"], "King");
        assert_eq!(stored["suit"], "spades");
        assert_eq!(stored["_id"], id.to_hex());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = backend();
        let filter = Filter::field_equals("id", "missing");

        let outcome = store
            .update_one("cards", &filter, doc(json!({"x": 1})))
            .await
            .unwrap();
        assert!(!outcome.is_match());

        let outcome = store.delete_one("cards", &filter).await.unwrap();
        assert!(!outcome.is_match());
    }

    #[tokio::test]
    async fn test_delete_removes_one() {
        let store = backend();
        store.insert_one("cards", doc(json!({"id": 1, "n": "a"}))).await.unwrap();
        store.insert_one("cards", doc(json!({"id": 1, "n": "b"}))).await.unwrap();

        let outcome = store
            .delete_one("cards", &Filter::field_equals("id", 1))
            .await
            .unwrap();
        assert_eq!(outcome.deleted, 1);

        let remaining = store.find("cards").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["n"], "b");
    }

    #[tokio::test]
    async fn test_health_check() {
        assert!(backend().health_check().await.is_ok());
    }
}
