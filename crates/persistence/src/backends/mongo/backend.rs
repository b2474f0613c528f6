//! MongoDB backend implementation.

use std::fmt::Debug;

use async_trait::async_trait;
use mongodb::bson::{self, Bson, doc};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::core::{BackendKind, DocumentStore};
use crate::error::{BackendError, StorageResult};
use crate::identifier::Filter;
use crate::types::{CANONICAL_ID_FIELD, CanonicalId, DeleteOutcome, Document, UpdateOutcome};

use super::convert::{filter_document, from_bson, object_id, to_bson};

fn query_error(e: mongodb::error::Error) -> BackendError {
    BackendError::QueryError {
        message: e.to_string(),
    }
}

/// Configuration for the MongoDB backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBackendConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    pub uri: String,

    /// Database holding one collection per resource kind.
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

fn default_database_name() -> String {
    "fullstack-app".to_string()
}

impl MongoBackendConfig {
    /// Creates a configuration for `uri` using the default database name.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database_name: default_database_name(),
        }
    }

    /// Sets the database name.
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }
}

/// MongoDB backend for resource documents.
///
/// Canonical ids are stored as native ObjectIds.
pub struct MongoBackend {
    database: Database,
    config: MongoBackendConfig,
}

impl Debug for MongoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoBackend")
            .field("database", &self.config.database_name)
            .finish_non_exhaustive()
    }
}

impl MongoBackend {
    /// Connects and verifies the deployment answers a ping.
    pub async fn connect(config: MongoBackendConfig) -> StorageResult<Self> {
        let connection_failed = |e: mongodb::error::Error| BackendError::ConnectionFailed {
            backend_name: "mongodb".to_string(),
            message: e.to_string(),
        };

        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(connection_failed)?;
        let database = client.database(&config.database_name);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_failed)?;

        tracing::info!(database = %config.database_name, "Connected to MongoDB");
        Ok(Self { database, config })
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &MongoBackendConfig {
        &self.config
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.database.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MongoDB
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| BackendError::Unavailable {
                backend_name: "mongodb".to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>, BackendError> {
        let mut cursor = self
            .collection(collection)
            .find(doc! {})
            .await
            .map_err(query_error)?;

        let mut documents = Vec::new();
        while cursor.advance().await.map_err(query_error)? {
            let raw = cursor.deserialize_current().map_err(query_error)?;
            documents.push(from_bson(raw));
        }
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, BackendError> {
        let found = self
            .collection(collection)
            .find_one(filter_document(filter)?)
            .await
            .map_err(query_error)?;
        Ok(found.map(from_bson))
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<CanonicalId, BackendError> {
        let id = CanonicalId::generate();
        let mut stored = to_bson(document)?;
        stored.insert(CANONICAL_ID_FIELD, object_id(&id));

        self.collection(collection)
            .insert_one(stored)
            .await
            .map_err(query_error)?;
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome, BackendError> {
        let set = to_bson(set)?;

        // An empty `$set` is rejected by the server.
        if set.is_empty() {
            let matched = self.find_one(collection, filter).await?.is_some();
            return Ok(UpdateOutcome {
                matched: u64::from(matched),
                modified: 0,
            });
        }

        let result = self
            .collection(collection)
            .update_one(filter_document(filter)?, doc! { "$set": Bson::Document(set) })
            .await
            .map_err(query_error)?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteOutcome, BackendError> {
        let result = self
            .collection(collection)
            .delete_one(filter_document(filter)?)
            .await
            .map_err(query_error)?;

        Ok(DeleteOutcome {
            deleted: result.deleted_count,
        })
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, BackendError> {
        self.collection(collection)
            .count_documents(doc! {})
            .await
            .map_err(query_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MongoBackendConfig::new("mongodb://localhost:27017");
        assert_eq!(config.database_name, "fullstack-app");

        let config = config.with_database_name("folio-test");
        assert_eq!(config.database_name, "folio-test");
    }
}
