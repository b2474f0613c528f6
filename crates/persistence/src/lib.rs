//! Folio Persistence Layer
//!
//! This crate stores the documents of a portfolio content backend (cards,
//! categories, users, portfolio images) and implements the generic
//! dual-identifier resource store shared by every resource kind.
//!
//! # Features
//!
//! - **Dual identifiers**: every document has a store-assigned canonical id
//!   and may carry a caller-assigned custom id (string or integer); reads and
//!   writes accept either
//! - **Immutable bookkeeping**: `_id`, `createdAt` and `updatedAt` are owned
//!   by the store and never taken from a payload
//! - **Multiple Backends**: memory, SQLite, MongoDB
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! folio-persistence = { version = "0.1", features = ["mongodb"] }
//! ```
//!
//! Available backend features:
//! - `sqlite` (default) - SQLite with in-memory and file modes
//! - `mongodb` - MongoDB document storage
//!
//! The memory backend is always available.
//!
//! # Architecture
//!
//! - [`types`] - Documents, canonical ids, resource kinds, write outcomes
//! - [`identifier`] - Identifier classification and lookup filters
//! - [`error`] - Error types for all operations
//! - [`core`] - The `DocumentStore` driver trait and the `ResourceStore`
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use folio_persistence::backends::memory::MemoryBackend;
//! use folio_persistence::core::ResourceStores;
//! use folio_persistence::identifier::FilterPolicy;
//! use folio_persistence::types::ResourceKind;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let stores = ResourceStores::new(Arc::new(MemoryBackend::new()), FilterPolicy::default());
//! stores.initialize_all().await.unwrap();
//!
//! let cards = stores.for_kind(ResourceKind::Cards);
//! let payload = json!({"name": "Ace"}).as_object().cloned().unwrap();
//! let id = cards.create(payload).await.unwrap();
//!
//! let stored = cards.get_by_identifier(&id.to_hex()).await.unwrap().unwrap();
//! assert_eq!(stored["name"], "Ace");
//! assert_eq!(stored["createdAt"], stored["updatedAt"]);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod identifier;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use types::{CanonicalId, Document, ResourceKind};

// Re-export core traits
pub use core::{BackendKind, DocumentStore, ResourceStore, ResourceStores};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
