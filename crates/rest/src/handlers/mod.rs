//! HTTP request handlers.
//!
//! One module per interaction:
//!
//! - [`list`] - List every document of a kind
//! - [`read`] - Read a document by canonical or custom identifier
//! - [`create`] - Create a document
//! - [`update`] - Merge fields into a document
//! - [`delete`] - Delete a document
//! - [`images`] - Public portfolio image listing
//! - [`profile`] - Read and update the owner profile
//! - [`health`] - Health, liveness and readiness endpoints

pub mod create;
pub mod delete;
pub mod health;
pub mod images;
pub mod list;
pub mod profile;
pub mod read;
pub mod update;

// Re-export handlers for convenience
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use images::images_handler;
pub use list::list_handler;
pub use profile::{get_profile_handler, update_profile_handler};
pub use read::read_handler;
pub use update::update_handler;
