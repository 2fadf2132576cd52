//! Client-state codec.
//!
//! Applications can attach an opaque state blob to any operation; it rides
//! through the broker round trip untouched and comes back with the response.
//! On the wire the blob is JSON wrapped in base64, with the current page URL
//! injected under `referrer` so the application can restore its location
//! after a redirect.

use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

/// Key under which the current page URL is injected
const REFERRER_KEY: &str = "referrer";

static BASE64_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // strict base64 alphabet with canonical padding
    Regex::new(r"^([0-9a-zA-Z+/]{4})*(([0-9a-zA-Z+/]{2}==)|([0-9a-zA-Z+/]{3}=))?$")
        .expect("base64 pattern is valid")
});

/// Prepare a client state value for transport: resolve it to an object,
/// inject `referrer` when absent, then JSON-encode and base64-wrap it.
///
/// A string input is treated as an already-encoded blob and decoded when it
/// looks like base64; any other non-object input degrades to an empty object.
#[must_use]
pub fn prepare(client_state: Option<&Value>, referrer: &str) -> String {
    let Some(client_state) = client_state else {
        return encode(&json!({ REFERRER_KEY: referrer }));
    };

    let mut state = match client_state {
        Value::String(blob) => {
            if is_encoded(blob) {
                decode_and_parse(blob).unwrap_or_else(|| json!({}))
            } else {
                json!({})
            }
        }
        Value::Object(_) => client_state.clone(),
        _ => json!({}),
    };

    if let Value::Object(map) = &mut state {
        if !map.contains_key(REFERRER_KEY) {
            map.insert(REFERRER_KEY.to_owned(), json!(referrer));
        }
    } else {
        // a decoded blob that held a bare scalar; keep only the referrer
        state = json!({ REFERRER_KEY: referrer });
    }
    encode(&state)
}

/// JSON-encode and base64-wrap a state value
#[must_use]
pub fn encode(client_state: &Value) -> String {
    general_purpose::STANDARD.encode(client_state.to_string())
}

/// Decode a state blob returned from the broker or the query string.
///
/// Empty input yields `None`. Input that does not look like base64, or fails
/// to decode or parse, degrades to an empty object — this never fails
/// outward.
#[must_use]
pub fn decode_and_parse(encoded_client_state: &str) -> Option<Value> {
    if encoded_client_state.is_empty() {
        return None;
    }
    if is_encoded(encoded_client_state) {
        if let Ok(bytes) = general_purpose::STANDARD.decode(encoded_client_state) {
            if let Ok(text) = String::from_utf8(bytes) {
                if let Ok(value) = serde_json::from_str(&text) {
                    return Some(value);
                }
            }
        }
        log::warn!("unable to decode client state: {encoded_client_state}");
    }
    Some(Value::Object(Map::new()))
}

/// True when the value matches the strict base64 alphabet and padding
#[must_use]
pub fn is_encoded(value: &str) -> bool {
    !value.is_empty() && BASE64_PATTERN.is_match(value)
}
