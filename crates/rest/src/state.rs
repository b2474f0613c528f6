//! Application state for the Folio REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the per-kind resource stores, the server configuration
//! and the identity verifier guarding mutating routes.

use std::sync::Arc;

use folio_persistence::core::{DocumentStore, ResourceStore, ResourceStores};
use folio_persistence::types::ResourceKind;

use crate::config::ServerConfig;
use crate::identity::IdentityVerifier;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The document store type. The server uses `dyn DocumentStore` so
///   the backend can be chosen at runtime.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use folio_persistence::backends::memory::MemoryBackend;
/// use folio_persistence::core::ResourceStores;
/// use folio_rest::identity::DenyAllVerifier;
/// use folio_rest::{AppState, ServerConfig};
///
/// let config = ServerConfig::for_testing();
/// let stores = ResourceStores::new(Arc::new(MemoryBackend::new()), config.filter_policy());
/// let state = AppState::new(stores, config, Arc::new(DenyAllVerifier));
/// assert_eq!(state.verifier().name(), "deny-all");
/// ```
pub struct AppState<S: ?Sized> {
    /// Resource stores sharing one backend handle.
    stores: ResourceStores<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Verifier for mutating routes.
    verifier: Arc<dyn IdentityVerifier>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S: ?Sized> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            stores: self.stores.clone(),
            config: Arc::clone(&self.config),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

impl<S: DocumentStore + ?Sized> AppState<S> {
    /// Creates a new AppState.
    ///
    /// # Arguments
    ///
    /// * `stores` - Resource stores over the shared backend
    /// * `config` - Server configuration
    /// * `verifier` - Identity verifier for mutating routes
    pub fn new(
        stores: ResourceStores<S>,
        config: ServerConfig,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        Self {
            stores,
            config: Arc::new(config),
            verifier,
        }
    }

    /// Returns the resource store for a kind.
    pub fn store(&self, kind: ResourceKind) -> ResourceStore<S> {
        self.stores.for_kind(kind)
    }

    /// Returns all resource stores.
    pub fn stores(&self) -> &ResourceStores<S> {
        &self.stores
    }

    /// Returns the shared document store.
    pub fn backend(&self) -> &S {
        self.stores.backend()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the identity verifier.
    pub fn verifier(&self) -> &Arc<dyn IdentityVerifier> {
        &self.verifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticTokenVerifier;
    use folio_persistence::backends::memory::MemoryBackend;
    use folio_persistence::core::BackendKind;

    fn state() -> AppState<MemoryBackend> {
        let config = ServerConfig::for_testing();
        let stores = ResourceStores::new(Arc::new(MemoryBackend::new()), config.filter_policy());
        AppState::new(
            stores,
            config,
            Arc::new(StaticTokenVerifier::new(["test-token"])),
        )
    }

    #[test]
    fn test_app_state_clone_shares_backend() {
        let state = state();
        let cloned = state.clone();
        assert!(std::ptr::eq(state.backend(), cloned.backend()));
    }

    #[test]
    fn test_store_for_kind() {
        let state = state();
        let store = state.store(ResourceKind::Categories);
        assert_eq!(store.kind(), ResourceKind::Categories);
        assert_eq!(state.backend().kind(), BackendKind::Memory);
    }
}
