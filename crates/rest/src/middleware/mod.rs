//! HTTP middleware for the Folio REST API.
//!
//! - [`auth`] - Bearer-token identity verification for mutating routes

pub mod auth;

pub use auth::{extract_token, require_identity};
