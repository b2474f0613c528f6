//! Folio route configuration.
//!
//! Defines all routes of the REST API.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use folio_persistence::core::DocumentStore;

use crate::handlers;
use crate::middleware::require_identity;
use crate::state::AppState;

/// Creates all REST API routes.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
/// - `GET /api/images` - Portfolio image listing
/// - `GET /api/me` - Owner profile
/// - `GET /api/{kind}` - List
/// - `GET /api/{kind}/{id}` - Read
///
/// ## Verified caller required
/// - `PUT /api/me` - Merge into the owner profile
/// - `POST /api/{kind}` - Create
/// - `PUT /api/{kind}/{id}` - Update
/// - `DELETE /api/{kind}/{id}` - Delete
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: DocumentStore + ?Sized + 'static,
{
    Router::new()
        .merge(public_routes::<S>())
        .merge(protected_routes(state.clone()))
        .with_state(state)
}

fn public_routes<S>() -> Router<AppState<S>>
where
    S: DocumentStore + ?Sized + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        .route("/api/images", get(handlers::images_handler::<S>))
        .route("/api/me", get(handlers::get_profile_handler::<S>))
        .route("/api/{kind}", get(handlers::list_handler::<S>))
        .route("/api/{kind}/{id}", get(handlers::read_handler::<S>))
}

fn protected_routes<S>(state: AppState<S>) -> Router<AppState<S>>
where
    S: DocumentStore + ?Sized + 'static,
{
    Router::new()
        .route("/api/me", put(handlers::update_profile_handler::<S>))
        .route("/api/{kind}", post(handlers::create_handler::<S>))
        .route(
            "/api/{kind}/{id}",
            put(handlers::update_handler::<S>).delete(handlers::delete_handler::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            require_identity::<S>,
        ))
}
