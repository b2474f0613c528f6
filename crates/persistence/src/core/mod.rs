//! Core storage traits and abstractions.
//!
//! The persistence layer is split in two tiers:
//!
//! - [`DocumentStore`] - Database driver abstraction over collections of
//!   JSON documents
//! - [`ResourceStore`] - The CRUD contract shared by every resource kind,
//!   built on any `DocumentStore`
//! - [`ProfileStore`] - The site owner's singleton profile document
//!
//! ```text
//! HTTP handlers
//!     └── ResourceStores (one handle, every kind)
//!             └── ResourceStore<S> (classify, filter, strip, timestamp)
//!                     └── S: DocumentStore (memory / sqlite / mongodb)
//! ```

pub mod backend;
pub mod document_store;
pub mod profile_store;
pub mod resource_store;

pub use backend::BackendKind;
pub use document_store::DocumentStore;
pub use profile_store::{PROFILE_COLLECTION, ProfileStore};
pub use resource_store::{ResourceStore, ResourceStores};
