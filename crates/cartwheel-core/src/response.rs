//! Interpretation of remote cart service response envelopes.
//!
//! Mutation responses carry a `success` flag that is sometimes a boolean and
//! sometimes the number `1`, and rejections carry their message under either
//! `error` (string or array of strings) or `message`. These helpers are the
//! single place that decodes that envelope.

use serde_json::Value;

/// Fallback message when a rejection carries no usable text.
const GENERIC_FAILURE: &str = "cart request failed";

/// Returns `true` only for `success: 1` or `success: true`; any other value
/// (including absence) is a rejection.
#[must_use]
pub fn is_success(resp: &Value) -> bool {
    match resp.get("success") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Extracts a human-readable message from a rejection response.
///
/// Precedence: `error` as a string, `error` as an array of strings (joined),
/// then `message`, then a generic fallback.
#[must_use]
pub fn error_message(resp: &Value) -> String {
    match resp.get("error") {
        Some(Value::String(s)) if !s.is_empty() => return s.clone(),
        Some(Value::Array(parts)) => {
            let joined = parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if !joined.is_empty() {
                return joined;
            }
        }
        _ => {}
    }
    resp.get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(|| GENERIC_FAILURE.to_owned(), ToOwned::to_owned)
}

/// Classifies a rejection message as the single-store-per-cart business rule.
#[must_use]
pub fn is_store_conflict(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("cart already contains") || lower.contains("different store")
}
