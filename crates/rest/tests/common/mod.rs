//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test application over the memory backend
//! - [`assertions`] - HTTP response assertions

#![allow(dead_code)]

pub mod assertions;
pub mod harness;
