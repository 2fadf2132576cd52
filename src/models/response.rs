//! Inbound broker responses.
//!
//! Responses arrive as `{response, details}` where `details` depends on the
//! response kind. The kinds are a closed tagged union so the dispatch switch
//! in [`crate::handler`] matches exhaustively; a payload whose `response`
//! value names no known kind fails typed decoding and is logged and ignored
//! at that boundary.

use crate::models::{Tokens, User};
use serde::{Deserialize, Serialize};

/// One inbound message from the broker frame
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "response", content = "details")]
pub enum ResponseMessage {
    /// The broker acknowledged the `initialize` handshake
    #[serde(rename = "initialized")]
    Initialized(ResponseDetails),

    /// Outcome of a `checkAuthentication` request
    #[serde(rename = "checkAuthentication")]
    CheckAuthentication(AuthenticationResponseDetails),

    /// Outcome of a `redeemCode` exchange
    #[serde(rename = "redeemCode")]
    RedeemCode(AuthenticationResponseDetails),

    /// Outcome of a `refreshTokens` renewal
    #[serde(rename = "refreshTokens")]
    RefreshTokens(AuthenticationResponseDetails),

    /// Outcome of a `logout` request
    #[serde(rename = "logout")]
    Logout(ResponseDetails),

    /// The broker wants this client to start the login redirect flow
    #[serde(rename = "redirectToLogin")]
    RedirectToLogin(RedirectResponseDetails),
}

impl ResponseMessage {
    /// Wire name of the response kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Initialized(_) => "initialized",
            Self::CheckAuthentication(_) => "checkAuthentication",
            Self::RedeemCode(_) => "redeemCode",
            Self::RefreshTokens(_) => "refreshTokens",
            Self::Logout(_) => "logout",
            Self::RedirectToLogin(_) => "redirectToLogin",
        }
    }

    /// Correlation id of the action that caused this response, when present
    #[must_use]
    pub fn details_id(&self) -> Option<&str> {
        match self {
            Self::Initialized(d) | Self::Logout(d) => d.id.as_deref(),
            Self::CheckAuthentication(d) | Self::RedeemCode(d) | Self::RefreshTokens(d) => {
                d.id.as_deref()
            }
            Self::RedirectToLogin(d) => d.id.as_deref(),
        }
    }

    /// The encoded client state carried by this response, when present
    #[must_use]
    pub fn client_state(&self) -> Option<&str> {
        match self {
            Self::Initialized(d) | Self::Logout(d) => d.client_state.as_deref(),
            Self::CheckAuthentication(d) | Self::RedeemCode(d) | Self::RefreshTokens(d) => {
                d.client_state.as_deref()
            }
            Self::RedirectToLogin(d) => d.client_state.as_deref(),
        }
    }

    /// Replace the encoded client state carried by this response
    pub fn set_client_state(&mut self, client_state: Option<String>) {
        match self {
            Self::Initialized(d) | Self::Logout(d) => d.client_state = client_state,
            Self::CheckAuthentication(d) | Self::RedeemCode(d) | Self::RefreshTokens(d) => {
                d.client_state = client_state;
            }
            Self::RedirectToLogin(d) => d.client_state = client_state,
        }
    }

    /// The user carried by this response, when the kind can carry one
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::CheckAuthentication(d) | Self::RedeemCode(d) | Self::RefreshTokens(d) => {
                d.user.as_ref()
            }
            _ => None,
        }
    }
}

/// Details carried by `initialized` and `logout` responses
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetails {
    /// The action id that initiated this response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Whether the call succeeded
    pub success: bool,

    /// Encoded client state, round-tripped unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,

    /// Error reported by the broker, when the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Details carried by authentication-bearing responses
/// (`checkAuthentication`, `redeemCode`, `refreshTokens`)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponseDetails {
    /// The action id that initiated this response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Whether the call succeeded
    pub success: bool,

    /// Whether the user holds a valid authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_authenticated: Option<bool>,

    /// The user's tokens, when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Tokens>,

    /// The user, when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    /// Encoded client state, round-tripped unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,

    /// Error reported by the broker, when the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Details carried by a `redirectToLogin` instruction
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponseDetails {
    /// The action id that initiated this response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Whether the call succeeded, when the broker reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    /// Encoded client state to carry into the redirect flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_check_authentication_response() {
        let message: ResponseMessage = serde_json::from_value(json!({
            "response": "checkAuthentication",
            "details": {
                "id": "action:checkAuthentication-7",
                "success": true,
                "isAuthenticated": true,
                "authentication": {"accessToken": "a", "idToken": "i", "refreshToken": "r"},
                "user": {"email": "a@b.c"}
            }
        }))
        .unwrap();
        assert_eq!(message.kind(), "checkAuthentication");
        assert_eq!(message.details_id(), Some("action:checkAuthentication-7"));
        let ResponseMessage::CheckAuthentication(details) = &message else {
            panic!("wrong variant");
        };
        assert!(details.success);
        assert_eq!(details.is_authenticated, Some(true));
        assert_eq!(
            details.authentication.as_ref().unwrap().access_token.as_deref(),
            Some("a")
        );
    }

    #[test]
    fn unknown_response_kind_fails_typed_decoding() {
        let result: Result<ResponseMessage, _> = serde_json::from_value(json!({
            "response": "somethingElse",
            "details": {"success": true}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn client_state_can_be_replaced_on_any_kind() {
        let mut message: ResponseMessage = serde_json::from_value(json!({
            "response": "redirectToLogin",
            "details": {"clientState": "b2xk"}
        }))
        .unwrap();
        assert_eq!(message.client_state(), Some("b2xk"));
        message.set_client_state(Some("bmV3".to_owned()));
        assert_eq!(message.client_state(), Some("bmV3"));
    }

    #[test]
    fn logout_response_round_trips() {
        let message = ResponseMessage::Logout(ResponseDetails {
            id: Some("action:logout-9".into()),
            success: true,
            ..ResponseDetails::default()
        });
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["response"], "logout");
        assert_eq!(value["details"]["success"], true);
        let back: ResponseMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, message);
    }
}
