//! Database backend implementations.
//!
//! This module contains implementations of [`DocumentStore`](crate::core::DocumentStore)
//! for the supported databases. Persistent backends are gated behind feature
//! flags.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | always | Process-local maps, for tests and throwaway servers |
//! | SQLite | `sqlite` | Lightweight embedded database, great for development |
//! | MongoDB | `mongodb` | Document store with native ObjectIds |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! use folio_persistence::backends::sqlite::SqliteBackend;
//!
//! # #[cfg(feature = "sqlite")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory SQLite backend
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Or use a file-based database
//! let backend = SqliteBackend::open("./data/folio.db")?;
//! # Ok(())
//! # }
//! ```

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "mongodb")]
pub mod mongo;
