//! # folio-rest - Portfolio Content REST API
//!
//! This crate provides the HTTP surface of the Folio portfolio backend: CRUD
//! endpoints over cards, categories, users and portfolio images, backed by
//! the dual-identifier resource store in `folio-persistence`.
//!
//! ## Features
//!
//! - **Dual identifiers**: every `{id}` path segment may be a canonical
//!   24-character hex identifier or a caller-assigned custom identifier
//! - **Verified mutations**: create, update and delete require a bearer
//!   token checked by a pluggable [`identity::IdentityVerifier`]
//! - **Runtime backend selection**: handlers are generic over the document
//!   store and work with `dyn DocumentStore`
//!
//! ## Backend Support
//!
//! Storage backends are configured through feature flags:
//!
//! - `sqlite` - SQLite backend (default, great for development)
//! - `mongodb` - MongoDB backend
//!
//! The in-memory backend is always available.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use folio_persistence::backends::memory::MemoryBackend;
//! use folio_persistence::core::{DocumentStore, ResourceStores};
//! use folio_rest::{ServerConfig, create_app_with_config, identity::verifier_from_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let backend: Arc<dyn DocumentStore> = Arc::new(MemoryBackend::new());
//!     let stores = ResourceStores::new(backend, config.filter_policy());
//!
//!     let verifier = verifier_from_config(&config);
//!     let app = create_app_with_config(stores, config.clone(), verifier);
//!
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern | Auth |
//! |------------|-------------|-------------|------|
//! | list | GET | `/api/{kind}` | public |
//! | read | GET | `/api/{kind}/{id}` | public |
//! | create | POST | `/api/{kind}` | bearer |
//! | update | PUT | `/api/{kind}/{id}` | bearer |
//! | delete | DELETE | `/api/{kind}/{id}` | bearer |
//! | images | GET | `/api/images` | public |
//! | profile | GET | `/api/me` | public |
//! | profile update | PUT | `/api/me` | bearer |
//! | health | GET | `/health` | public |
//!
//! `{kind}` is one of `cards`, `categories`, `users`, `portfolio`.
//!
//! ## Error Handling
//!
//! All errors are returned as `{"error": "<message>"}`:
//!
//! | HTTP Status | Description |
//! |-------------|-------------|
//! | 400 | Body is not a JSON object, or malformed canonical identifier |
//! | 401 | Missing or rejected token |
//! | 404 | Unknown kind, no document matches (`"Card not found"`), or no profile yet |
//! | 415 | Body is not JSON |
//! | 500 | Storage fault |
//!
//! ## Configuration
//!
//! See [`ServerConfig`]. Every flag has a `REST_*` environment fallback.
//!
//! ## Architecture
//!
//! - [`error`] - Error types and `{"error": ...}` responses
//! - [`config`] - Server configuration
//! - [`identity`] - Token verifiers
//! - [`state`] - Application state (resource stores, configuration, verifier)
//! - [`handlers`] - HTTP request handlers for each interaction
//! - [`middleware`] - Identity middleware for mutating routes
//! - [`extractors`] - Payload and path extractors
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, request::Parts},
};
use folio_persistence::core::{DocumentStore, ResourceStores};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::identity::IdentityVerifier;

/// Creates the Axum application with default configuration.
///
/// Uses [`ServerConfig::default`] and the verifier it describes. For more
/// control, use [`create_app_with_config`].
pub fn create_app<S>(stores: ResourceStores<S>) -> Router
where
    S: DocumentStore + ?Sized + 'static,
{
    let config = ServerConfig::default();
    let verifier = identity::verifier_from_config(&config);
    create_app_with_config(stores, config, verifier)
}

/// Creates the Axum application with custom configuration.
///
/// This function sets up every route together with request ids, tracing,
/// the request timeout, the body size limit and (optionally) CORS.
///
/// # Arguments
///
/// * `stores` - Resource stores over the shared backend
/// * `config` - Server configuration
/// * `verifier` - Identity verifier for mutating routes
pub fn create_app_with_config<S>(
    stores: ResourceStores<S>,
    config: ServerConfig,
    verifier: Arc<dyn IdentityVerifier>,
) -> Router
where
    S: DocumentStore + ?Sized + 'static,
{
    info!(
        backend = %stores.backend().kind(),
        verifier = verifier.name(),
        legacy_id_fallback = stores.policy().legacy_canonical_fallback,
        "Creating REST API server"
    );

    // Create application state
    let state = AppState::new(stores, config.clone(), verifier);

    // Build the router with all routes
    let router = routing::create_routes(state).layer(DefaultBodyLimit::max(config.max_body_size));

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
///
/// Each setting is a comma-separated list, or `*` for any. Origins are
/// checked with [`ServerConfig::cors_origin_allowed`], so hosts listed in
/// `cors_origin_hosts` pass on any scheme and port.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins.trim() == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let policy = config.clone();
        cors = cors.allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .is_ok_and(|origin| policy.cors_origin_allowed(origin))
            },
        ));
    }

    // Configure methods
    if config.cors_methods.trim() == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers.trim() == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    if config.cors_credentials_enabled() {
        cors = cors.allow_credentials(true);
    } else if config.cors_allow_credentials {
        warn!("CORS credentials disabled because a CORS setting is '*'");
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` wins over
/// `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "folio_rest={level},folio_persistence={level},folio_server={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
