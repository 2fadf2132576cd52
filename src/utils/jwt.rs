//! Unverified JWT payload inspection.
//!
//! Signature verification belongs to the broker; this client only needs to
//! read the expiry claim to schedule refreshes and derive storage TTLs.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Decode a JWT's payload segment without verifying the signature.
///
/// Returns `None` (after logging) for anything that is not a decodable JWT.
#[must_use]
pub fn parse_token(token: &str) -> Option<Value> {
    if token.is_empty() {
        return None;
    }
    let Some(payload_b64) = token.split('.').nth(1) else {
        log::error!("failed to parse token: missing payload segment");
        return None;
    };
    let decoded = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| general_purpose::STANDARD.decode(payload_b64));
    let bytes = match decoded {
        Ok(bytes) => bytes,
        Err(err) => {
            log::error!("failed to parse token: {err}");
            return None;
        }
    };
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::error!("failed to parse token: {err}");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            log::error!("failed to parse token: {err}");
            None
        }
    }
}

/// The instant a token's `exp` claim names, when the token is decodable and
/// carries one
#[must_use]
pub fn token_expiration(token: &str) -> Option<DateTime<Utc>> {
    let exp = parse_token(token)?.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    fn forge(payload: &str) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{body}.sig")
    }

    #[test]
    fn reads_claims_from_a_forged_token() {
        let token = forge(r#"{"sub":"user-1","exp":1900000000}"#);
        let claims = parse_token(&token).unwrap();
        assert_eq!(claims["sub"], "user-1");
        assert_eq!(claims["exp"], 1_900_000_000);
    }

    #[test]
    fn expiration_maps_the_exp_claim() {
        let token = forge(r#"{"exp":1900000000}"#);
        let expiration = token_expiration(&token).unwrap();
        assert_eq!(expiration.timestamp(), 1_900_000_000);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_token(""), None);
        assert_eq!(parse_token("no-dots-here"), None);
        assert_eq!(parse_token("a.%%%.c"), None);
        assert_eq!(token_expiration(&forge(r#"{"sub":"no-exp"}"#)), None);
    }
}
