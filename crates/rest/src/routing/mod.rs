//! Route configuration for the Folio REST API.

pub mod api_routes;

pub use api_routes::create_routes;
