//! CORS policy tests with the default server configuration.

mod common;

use axum::http::{HeaderValue, header};
use common::harness::TestApp;
use folio_rest::ServerConfig;

fn app() -> TestApp {
    TestApp::with_config(ServerConfig::default())
}

async fn allowed_origin(app: &TestApp, origin: &'static str) -> Option<String> {
    let response = app
        .server
        .get("/api/cards")
        .add_header(header::ORIGIN, HeaderValue::from_static(origin))
        .await;
    response.assert_status_ok();

    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

#[tokio::test]
async fn test_listed_origin_is_echoed_with_credentials() {
    let app = app();

    let response = app
        .server
        .get("/api/cards")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://portfolio-admin-panel-brown.vercel.app"),
        )
        .await;

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://portfolio-admin-panel-brown.vercel.app"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_figma_and_local_hosts_on_any_port() {
    let app = app();

    for origin in [
        "https://plugin.figma.com",
        "http://localhost:5173",
        "http://127.0.0.1:4000",
    ] {
        assert_eq!(
            allowed_origin(&app, origin).await.as_deref(),
            Some(origin),
            "{origin} should be allowed"
        );
    }
}

#[tokio::test]
async fn test_unknown_origin_gets_no_cors_headers() {
    let app = app();

    for origin in ["https://evil.example", "https://figma.com.evil.example"] {
        assert_eq!(allowed_origin(&app, origin).await, None, "{origin}");
    }
}

#[tokio::test]
async fn test_preflight_allows_token_headers() {
    let app = app();

    let response = app
        .server
        .method(axum::http::Method::OPTIONS, "/api/cards")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://www.figma.com"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("authtoken"),
        )
        .await;

    response.assert_status_ok();
    let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("authtoken"), "{allowed}");
}
