//! Core types for the persistence layer.
//!
//! - [`Document`] - A JSON document and its store-managed field names
//! - [`CanonicalId`] - The store-assigned 12-byte identifier
//! - [`ResourceKind`] - The parallel CRUD domains (cards, categories, ...)
//! - [`UpdateOutcome`], [`DeleteOutcome`] - Write operation counts
//!
//! # Examples
//!
//! ```
//! use folio_persistence::types::{CanonicalId, ResourceKind};
//!
//! let id = CanonicalId::generate();
//! assert_eq!(id.to_hex().len(), 24);
//!
//! let kind: ResourceKind = "cards".parse().unwrap();
//! assert_eq!(kind.collection_name(), "cards");
//! ```

mod canonical_id;
mod document;
mod outcome;
mod resource_kind;

pub use canonical_id::CanonicalId;
pub use document::{
    CANONICAL_ID_FIELD, CREATED_AT_FIELD, CUSTOM_ID_FIELD, Document, STORE_MANAGED_FIELDS,
    UPDATED_AT_FIELD, canonical_id_of, format_timestamp, next_updated_at,
    strip_store_managed_fields,
};
pub use outcome::{DeleteOutcome, UpdateOutcome};
pub use resource_kind::{ParseResourceKindError, ResourceKind};
