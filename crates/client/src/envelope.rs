//! The storefront's response envelope.
//!
//! Most endpoints wrap their payload as
//! `{"status": 200, "data": ..., "messages": [{"type": ..., "content": ...}]}`,
//! but some return the bare payload. These helpers read the envelope without
//! assuming it is there.

use serde_json::Value;

/// Inner `status` field, if it is a non-zero integer.
pub(crate) fn inner_status(body: &Value) -> Option<i64> {
    body.get("status")
        .and_then(Value::as_i64)
        .filter(|status| *status != 0)
}

/// `content` of the first entry in `messages`.
pub(crate) fn first_message(body: &Value) -> Option<String> {
    body.get("messages")?
        .as_array()?
        .first()?
        .get("content")?
        .as_str()
        .map(str::to_owned)
}

/// The `data` field if present, otherwise the whole body.
pub(crate) fn into_payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Object(map)),
        other => other,
    }
}

/// Entries of a list payload that may come bare or wrapped as `{key: [...]}`.
pub(crate) fn list_payload(payload: Value, key: &str) -> Vec<Value> {
    match payload {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
