//! SQLite backend implementation.
//!
//! Supports both in-memory databases (for tests) and file-based databases
//! (for development and small deployments).
//!
//! # Example
//!
//! ```no_run
//! use folio_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory database
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Or a file-based one; the schema is created on open
//! let backend = SqliteBackend::open("./data/folio.db")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE documents (
//!     collection TEXT NOT NULL,
//!     id TEXT NOT NULL,    -- canonical id, 24 lowercase hex chars
//!     data TEXT NOT NULL,  -- JSON document without _id
//!     PRIMARY KEY (collection, id)
//! );
//! ```
//!
//! Store-native order is insertion order (`rowid`).

mod backend;
mod filter;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use schema::SCHEMA_VERSION;
