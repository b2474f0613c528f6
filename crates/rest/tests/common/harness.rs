//! REST API test harness.
//!
//! Builds the full application over a shared [`MemoryBackend`] with the
//! static token `test-token` accepted for mutating routes.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use folio_persistence::backends::memory::MemoryBackend;
use folio_persistence::core::{DocumentStore, ResourceStores};
use folio_persistence::types::{Document, ResourceKind};
use folio_rest::ServerConfig;
use folio_rest::identity::{IdentityVerifier, StaticTokenVerifier};
use serde_json::Value;

/// Token accepted by the harness.
pub const TEST_TOKEN: &str = "test-token";

/// Legacy token header.
pub const AUTHTOKEN: HeaderName = HeaderName::from_static("authtoken");

/// A running test application plus direct access to its backend.
pub struct TestApp {
    pub server: TestServer,
    pub backend: Arc<MemoryBackend>,
    pub stores: ResourceStores<dyn DocumentStore>,
}

impl TestApp {
    /// Creates an app with the test configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates an app with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let verifier: Arc<dyn IdentityVerifier> =
            Arc::new(StaticTokenVerifier::new([TEST_TOKEN]));
        Self::with_verifier(config, verifier)
    }

    /// Creates an app with a custom configuration and verifier.
    pub fn with_verifier(config: ServerConfig, verifier: Arc<dyn IdentityVerifier>) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let shared: Arc<dyn DocumentStore> = backend.clone();
        let stores = ResourceStores::new(shared, config.filter_policy());

        let app = folio_rest::create_app_with_config(stores.clone(), config, verifier);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            backend,
            stores,
        }
    }

    /// Creates a document directly through the resource store and returns
    /// its canonical id.
    pub async fn seed(&self, kind: ResourceKind, payload: Value) -> String {
        let document: Document = payload
            .as_object()
            .cloned()
            .expect("seed payload must be an object");
        self.stores
            .for_kind(kind)
            .create(document)
            .await
            .expect("Failed to seed document")
            .to_hex()
    }
}

/// `Authorization: Bearer test-token`.
pub fn bearer() -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", TEST_TOKEN)).expect("valid header")
}
