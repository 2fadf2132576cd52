//! The session token triple.

use serde::{Deserialize, Serialize};

/// Immutable triple of session tokens, each independently optional.
///
/// A `Tokens` value is never mutated once constructed — a refresh produces a
/// new value. Persistence lives in [`crate::session::TokenStore`]; this type
/// is the transient value carried on the wire and handed to callers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    /// Access token (JWT), when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// ID token (JWT), when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    /// Refresh token, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Tokens {
    /// Build a token triple from its parts
    #[must_use]
    pub fn new(
        access_token: Option<String>,
        id_token: Option<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token,
            id_token,
            refresh_token,
        }
    }

    /// True when none of the three tokens is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.id_token.is_none() && self.refresh_token.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_camel_case_and_omits_absent_fields() {
        let tokens = Tokens::new(Some("a".into()), None, Some("r".into()));
        let value = serde_json::to_value(&tokens).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"accessToken": "a", "refreshToken": "r"})
        );
    }

    #[test]
    fn empty_detection() {
        assert!(Tokens::default().is_empty());
        assert!(!Tokens::new(None, Some("id".into()), None).is_empty());
    }
}
