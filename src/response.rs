//! Lambda proxy response builders shared by both handlers.

use serde_json::{Value, json};

/// Returns a response whose `body` is the given JSON serialized to a string.
#[must_use]
pub fn json_response(status_code: u16, body: &str) -> Value {
    json!({ "statusCode": status_code, "body": body })
}

/// Same as [`json_response`] but readable from any browser origin.
#[must_use]
pub fn cors_json_response(status_code: u16, body: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Access-Control-Allow-Origin": "*" },
        "body": body
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(status_code, &json!({ "error": message }).to_string())
}

/// [`err_response`] readable from any browser origin.
#[must_use]
pub fn cors_err_response(status_code: u16, message: &str) -> Value {
    cors_json_response(status_code, &json!({ "error": message }).to_string())
}

/// 500 for failures outside any per-item boundary.
#[must_use]
pub fn handler_error(details: &str) -> Value {
    json_response(
        500,
        &json!({ "error": "handler_error", "details": details }).to_string(),
    )
}
