//! Dual-identifier resolution.
//!
//! Every resource may be addressed by its store-assigned canonical
//! identifier or by a caller-assigned custom identifier. Resolution happens
//! in two pure steps:
//!
//! 1. [`ResourceIdentifier::classify`] decides, from the shape of the string
//!    alone, which kind of identifier the caller supplied.
//! 2. [`build_filter`] turns the classified identifier into a backend-neutral
//!    [`Filter`], applying the [`FilterPolicy`] for the operation's
//!    [`FilterPurpose`].
//!
//! ```
//! use folio_persistence::identifier::{
//!     build_filter, Filter, FilterPolicy, FilterPurpose, ResourceIdentifier,
//! };
//!
//! let id = ResourceIdentifier::classify("42");
//! assert!(!id.is_canonical());
//!
//! let filter = build_filter(&id, FilterPurpose::Read, &FilterPolicy::default()).unwrap();
//! assert!(matches!(filter, Filter::AnyOf(ref branches) if branches.len() == 2));
//! ```

mod classify;
mod filter;

pub use classify::{ResourceIdentifier, is_canonical_shape};
pub use filter::{
    Filter, FilterPolicy, FilterPurpose, build_filter, custom_id_filter, leading_integer,
};
