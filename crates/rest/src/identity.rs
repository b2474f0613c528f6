//! Caller identity verification.
//!
//! The REST layer decides which routes need a verified caller; the check
//! itself is delegated to an [`IdentityVerifier`]. Three verifiers ship with
//! the crate:
//!
//! - [`StaticTokenVerifier`] - accepts a fixed set of opaque tokens
//! - [`JwtVerifier`] - validates HS256 JWTs against a shared secret
//! - [`DenyAllVerifier`] - rejects everything
//!
//! [`verifier_from_config`] picks one from the server configuration.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::ServerConfig;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedIdentity {
    /// Stable subject identifier (token owner or JWT `sub`).
    pub subject: String,
}

impl VerifiedIdentity {
    /// Creates an identity for the given subject.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

impl fmt::Display for VerifiedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subject)
    }
}

/// Reasons a token was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The request carried no token.
    #[error("missing credentials")]
    MissingToken,

    /// The token is unknown, expired or badly signed.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// No verifier is configured, so nothing can be verified.
    #[error("authentication is not configured")]
    NotConfigured,
}

/// Checks a bearer token and returns the caller it belongs to.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Verifies `token`.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Accepts any token from a configured set.
///
/// The token itself is not logged; the identity subject is
/// `static:<n>` where `n` is the token's position in the configured list.
pub struct StaticTokenVerifier {
    tokens: HashSet<String>,
    order: Vec<String>,
}

impl fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenVerifier")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl StaticTokenVerifier {
    /// Creates a verifier for the given tokens. Empty tokens are ignored.
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut order = Vec::new();
        let mut set = HashSet::new();
        for token in tokens {
            let token = token.into();
            if !token.is_empty() && set.insert(token.clone()) {
                order.push(token);
            }
        }
        Self { tokens: set, order }
    }

    /// Number of accepted tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no token is accepted.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        if !self.tokens.contains(token) {
            return Err(AuthError::InvalidToken("unknown token".to_string()));
        }
        let position = self.order.iter().position(|t| t == token).unwrap_or(0);
        Ok(VerifiedIdentity::new(format!("static:{}", position)))
    }
}

/// Claims read from an incoming JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject.
    pub sub: String,
    /// Expiry (seconds since the epoch).
    pub exp: u64,
}

/// Validates HS256 JWTs signed with a shared secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

impl JwtVerifier {
    /// Creates a verifier for tokens signed with `secret`.
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    fn name(&self) -> &'static str {
        "jwt"
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(VerifiedIdentity::new(data.claims.sub))
    }
}

/// Rejects every token.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAllVerifier;

#[async_trait]
impl IdentityVerifier for DenyAllVerifier {
    fn name(&self) -> &'static str {
        "deny-all"
    }

    async fn verify(&self, _token: &str) -> Result<VerifiedIdentity, AuthError> {
        Err(AuthError::NotConfigured)
    }
}

/// Picks the verifier described by `config`.
///
/// A JWT secret wins over static tokens. With neither configured, every
/// mutation is rejected.
pub fn verifier_from_config(config: &ServerConfig) -> Arc<dyn IdentityVerifier> {
    if let Some(secret) = config.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
        info!("Using JWT identity verification");
        return Arc::new(JwtVerifier::from_secret(secret.as_bytes()));
    }

    let tokens = config.auth_token_list();
    if !tokens.is_empty() {
        info!(count = tokens.len(), "Using static token identity verification");
        return Arc::new(StaticTokenVerifier::new(tokens));
    }

    info!("No identity verifier configured; mutating routes will reject all requests");
    Arc::new(DenyAllVerifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &[u8] = b"folio-test-secret";

    fn token_for(sub: &str, exp: u64) -> String {
        let claims = JwtClaims {
            sub: sub.to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn far_future() -> u64 {
        (chrono::Utc::now().timestamp() + 3600) as u64
    }

    #[tokio::test]
    async fn test_static_accepts_known_token() {
        let verifier = StaticTokenVerifier::new(["alpha", "beta"]);
        let identity = verifier.verify("beta").await.unwrap();
        assert_eq!(identity.subject, "static:1");
    }

    #[tokio::test]
    async fn test_static_rejects_unknown_token() {
        let verifier = StaticTokenVerifier::new(["alpha"]);
        assert!(matches!(
            verifier.verify("gamma").await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_static_ignores_empty_and_duplicates() {
        let verifier = StaticTokenVerifier::new(["", "a", "a"]);
        assert_eq!(verifier.len(), 1);
    }

    #[tokio::test]
    async fn test_jwt_round_trip() {
        let verifier = JwtVerifier::from_secret(SECRET);
        let identity = verifier
            .verify(&token_for("user-7", far_future()))
            .await
            .unwrap();
        assert_eq!(identity.subject, "user-7");
    }

    #[tokio::test]
    async fn test_jwt_rejects_wrong_secret() {
        let verifier = JwtVerifier::from_secret(b"another-secret");
        assert!(
            verifier
                .verify(&token_for("user-7", far_future()))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_jwt_rejects_expired() {
        let verifier = JwtVerifier::from_secret(SECRET);
        assert!(verifier.verify(&token_for("user-7", 1_000)).await.is_err());
    }

    #[tokio::test]
    async fn test_deny_all() {
        assert_eq!(
            DenyAllVerifier.verify("anything").await,
            Err(AuthError::NotConfigured)
        );
    }

    #[test]
    fn test_verifier_from_config() {
        let mut config = ServerConfig::for_testing();
        assert_eq!(verifier_from_config(&config).name(), "static");

        config.jwt_secret = Some("s3cret".to_string());
        assert_eq!(verifier_from_config(&config).name(), "jwt");

        config.jwt_secret = None;
        config.auth_tokens = None;
        assert_eq!(verifier_from_config(&config).name(), "deny-all");
    }
}
