//! Response assertions shared by the REST tests.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts the response has the given status and an `{"error": msg}` body.
pub fn assert_error(response: &TestResponse, status: u16, message: &str) {
    assert_eq!(
        response.status_code().as_u16(),
        status,
        "unexpected status, body: {}",
        response.text()
    );
    let body: Value = response.json();
    assert_eq!(body, serde_json::json!({ "error": message }));
}

/// Asserts the response is an `{"error": ...}` body with the given status,
/// without pinning the message.
pub fn assert_error_status(response: &TestResponse, status: u16) {
    assert_eq!(
        response.status_code().as_u16(),
        status,
        "unexpected status, body: {}",
        response.text()
    );
    let body: Value = response.json();
    assert!(
        body.get("error").and_then(Value::as_str).is_some(),
        "expected an error body, got {}",
        body
    );
}

/// Asserts that `value` is a 24-character lowercase hex identifier.
pub fn assert_canonical_id(value: &Value) {
    let re = regex::Regex::new(r"^[0-9a-f]{24}$").expect("valid regex");
    let id = value.as_str().expect("identifier must be a string");
    assert!(re.is_match(id), "not a canonical id: {}", id);
}
