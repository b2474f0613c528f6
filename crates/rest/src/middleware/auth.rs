//! Bearer-token identity middleware.
//!
//! Mutating routes are wrapped with [`require_identity`]. The token is read
//! from `Authorization: Bearer <token>` or, for older clients, from the
//! `authtoken` header, and handed to the configured
//! [`IdentityVerifier`](crate::identity::IdentityVerifier). On success the
//! [`VerifiedIdentity`] is stored in the request extensions.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use folio_persistence::core::DocumentStore;
use tracing::{debug, warn};

use crate::error::RestError;
use crate::identity::{AuthError, VerifiedIdentity};
use crate::state::AppState;

/// Legacy header carrying a raw token.
pub static AUTHTOKEN: HeaderName = HeaderName::from_static("authtoken");

/// Extracts the caller's token from request headers.
///
/// `Authorization: Bearer` takes precedence over `authtoken`. Blank values
/// count as missing.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let (scheme, token) = v.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get(&AUTHTOKEN)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}

/// Middleware that rejects requests without a verified identity.
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_identity<S>(
    State(state): State<AppState<S>>,
    mut request: Request,
    next: Next,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let token = extract_token(request.headers()).map(str::to_owned);
    let result = match token {
        Some(token) => state.verifier().verify(&token).await,
        None => Err(AuthError::MissingToken),
    };

    match result {
        Ok(identity) => {
            debug!(
                subject = %identity.subject,
                verifier = state.verifier().name(),
                method = %method,
                path = %path,
                "Verified caller"
            );
            request.extensions_mut().insert::<VerifiedIdentity>(identity);
            next.run(request).await
        }
        Err(e) => {
            warn!(method = %method, path = %path, reason = %e, "Rejected unauthenticated request");
            RestError::Unauthorized {
                reason: e.to_string(),
            }
            .into_response()
        }
    }
}
