//! MongoDB backend implementation.
//!
//! Each resource kind maps to a collection of the same name in one
//! database. Filters are compiled to query documents: custom identifier
//! unions become `$or`, canonical lookups match a native ObjectId.
//!
//! ```no_run
//! use folio_persistence::backends::mongo::{MongoBackend, MongoBackendConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MongoBackendConfig::new("mongodb://localhost:27017");
//! let backend = MongoBackend::connect(config).await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod convert;

pub use backend::{MongoBackend, MongoBackendConfig};
