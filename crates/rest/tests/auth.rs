//! Identity verification tests.
//!
//! Reads are public; create, update and delete need a verified caller.

mod common;

use std::sync::Arc;

use axum::http::{HeaderValue, header};
use common::assertions::assert_error;
use common::harness::{AUTHTOKEN, TEST_TOKEN, TestApp, bearer};
use folio_persistence::types::ResourceKind;
use folio_rest::ServerConfig;
use folio_rest::identity::{DenyAllVerifier, JwtClaims, JwtVerifier};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

const JWT_SECRET: &[u8] = b"folio-integration-secret";

fn jwt(sub: &str) -> String {
    let claims = JwtClaims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now().timestamp() + 600) as u64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .expect("failed to encode test JWT")
}

#[tokio::test]
async fn test_create_without_token_returns_401() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/cards")
        .json(&json!({"name": "Ace"}))
        .await;

    assert_error(&response, 401, "Unauthorized");
    assert_eq!(app.backend.len("cards"), 0);
}

#[tokio::test]
async fn test_create_with_wrong_token_returns_401() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/cards")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-the-token"),
        )
        .json(&json!({"name": "Ace"}))
        .await;

    assert_error(&response, 401, "Unauthorized");
}

#[tokio::test]
async fn test_update_and_delete_without_token_return_401() {
    let app = TestApp::new();
    let id = app.seed(ResourceKind::Cards, json!({"name": "Ace"})).await;
    let path = format!("/api/cards/{}", id);

    let response = app.server.put(&path).json(&json!({"name": "Two"})).await;
    assert_error(&response, 401, "Unauthorized");

    let response = app.server.delete(&path).await;
    assert_error(&response, 401, "Unauthorized");

    let body: serde_json::Value = app.server.get(&path).await.json();
    assert_eq!(body["name"], "Ace");
}

#[tokio::test]
async fn test_missing_id_without_token_is_401_not_404() {
    let app = TestApp::new();

    let response = app.server.delete("/api/cards/missing").await;

    assert_error(&response, 401, "Unauthorized");
}

#[tokio::test]
async fn test_authtoken_header_is_accepted() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/cards")
        .add_header(AUTHTOKEN, HeaderValue::from_static(TEST_TOKEN))
        .json(&json!({"name": "Ace"}))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn test_reads_are_public() {
    let app = TestApp::new();
    app.seed(ResourceKind::Cards, json!({"id": 1, "name": "Ace"}))
        .await;

    app.server.get("/api/cards").await.assert_status_ok();
    app.server.get("/api/cards/1").await.assert_status_ok();
    app.server.get("/api/images").await.assert_status_ok();
}

#[tokio::test]
async fn test_deny_all_rejects_valid_looking_token() {
    let app = TestApp::with_verifier(ServerConfig::for_testing(), Arc::new(DenyAllVerifier));

    let response = app
        .server
        .post("/api/cards")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({"name": "Ace"}))
        .await;

    assert_error(&response, 401, "Unauthorized");
}

#[tokio::test]
async fn test_jwt_bearer_is_accepted() {
    let app = TestApp::with_verifier(
        ServerConfig::for_testing(),
        Arc::new(JwtVerifier::from_secret(JWT_SECRET)),
    );

    let response = app
        .server
        .post("/api/categories")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", jwt("editor-1"))).unwrap(),
        )
        .json(&json!({"name": "Hearts"}))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn test_jwt_signed_with_other_secret_is_rejected() {
    let app = TestApp::with_verifier(
        ServerConfig::for_testing(),
        Arc::new(JwtVerifier::from_secret(b"some-other-secret")),
    );

    let response = app
        .server
        .post("/api/categories")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", jwt("editor-1"))).unwrap(),
        )
        .json(&json!({"name": "Hearts"}))
        .await;

    assert_error(&response, 401, "Unauthorized");
}
