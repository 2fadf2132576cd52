//! Outbound action messages.
//!
//! Every high-level operation becomes one `Action` posted to the broker
//! frame: `{clientId, action, details}`. The `details` record is a tagged
//! variant keyed by the action kind, so each action declares exactly the
//! fields it carries. Every action except `initialize` that expects a reply
//! carries a unique correlation id in `details.id`.

use crate::models::Tokens;
use serde::{Deserialize, Serialize};

/// One outbound message to the broker frame
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// The client id registered with the broker
    pub client_id: String,

    /// The action kind and its details
    #[serde(flatten)]
    pub payload: ActionPayload,
}

impl Action {
    /// Build an action for the given client
    #[must_use]
    pub fn new(client_id: impl Into<String>, payload: ActionPayload) -> Self {
        Self {
            client_id: client_id.into(),
            payload,
        }
    }

    /// Wire name of the action kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.payload {
            ActionPayload::Initialize(_) => "initialize",
            ActionPayload::CheckAuthentication(_) => "checkAuthentication",
            ActionPayload::Logout(_) => "logout",
            ActionPayload::RedeemCode(_) => "redeemCode",
            ActionPayload::RefreshTokens(_) => "refreshTokens",
        }
    }
}

/// Action kind plus its kind-specific details
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "action", content = "details")]
pub enum ActionPayload {
    /// Handshake sent once the broker frame has loaded
    #[serde(rename = "initialize")]
    Initialize(ActionDetails),

    /// Verify the current tokens with the broker
    #[serde(rename = "checkAuthentication")]
    CheckAuthentication(AuthenticationActionDetails),

    /// Server-side logout
    #[serde(rename = "logout")]
    Logout(LogoutActionDetails),

    /// Exchange an authorization code for tokens
    #[serde(rename = "redeemCode")]
    RedeemCode(RedeemCodeActionDetails),

    /// Silent token renewal
    #[serde(rename = "refreshTokens")]
    RefreshTokens(RefreshTokensActionDetails),
}

/// Details common to actions that carry nothing but a correlation id
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionDetails {
    /// Correlation id threading the request to its response
    pub id: String,

    /// Encoded client state returned untouched with the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
}

/// Details for `checkAuthentication`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationActionDetails {
    /// Correlation id threading the request to its response
    pub id: String,

    /// Redirect to the login page when the broker finds the user unauthenticated
    pub redirect_unauthenticated: bool,

    /// Where the broker should send the user back after a redirect
    pub redirection_return_url: String,

    /// The tokens currently held by this client
    pub authentication: Tokens,

    /// The registered redirect URI for this client
    pub redirect_uri: String,

    /// Encoded client state returned untouched with the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
}

/// Details for `logout`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogoutActionDetails {
    /// Correlation id threading the request to its response
    pub id: String,

    /// Redirect to the login page once logged out
    pub redirect_unauthenticated: bool,

    /// The registered redirect URI for this client
    pub redirect_uri: String,

    /// Encoded client state returned untouched with the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,

    /// Log out of just the client app, leaving the SSO session alive
    pub client_only_logout: bool,
}

/// Details for `redeemCode`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCodeActionDetails {
    /// Correlation id threading the request to its response
    pub id: String,

    /// The authorization code to exchange
    pub code: String,

    /// The PKCE verifier persisted when the flow was initiated, if still valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<String>,

    /// The registered redirect URI for this client
    pub redirect_uri: String,

    /// The client id registered with the broker
    pub client_id: String,

    /// Encoded client state returned untouched with the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
}

/// Details for `refreshTokens`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokensActionDetails {
    /// Correlation id threading the request to its response
    pub id: String,

    /// The tokens currently held by this client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Tokens>,

    /// Encoded client state returned untouched with the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initialize_wire_shape() {
        let action = Action::new(
            "client-1",
            ActionPayload::Initialize(ActionDetails {
                id: "action:initialize-1".into(),
                client_state: None,
            }),
        );
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "clientId": "client-1",
                "action": "initialize",
                "details": {"id": "action:initialize-1"}
            })
        );
    }

    #[test]
    fn redeem_code_wire_shape() {
        let action = Action::new(
            "client-1",
            ActionPayload::RedeemCode(RedeemCodeActionDetails {
                id: "action:redeemCode-2".into(),
                code: "1234".into(),
                code_verifier: Some("verifier".into()),
                redirect_uri: "https://app.example.com".into(),
                client_id: "client-1".into(),
                client_state: None,
            }),
        );
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["action"], "redeemCode");
        assert_eq!(value["details"]["code"], "1234");
        assert_eq!(value["details"]["codeVerifier"], "verifier");
        assert_eq!(value["details"]["clientId"], "client-1");
        assert_eq!(action.kind(), "redeemCode");
    }

    #[test]
    fn check_authentication_carries_current_tokens() {
        let action = Action::new(
            "client-1",
            ActionPayload::CheckAuthentication(AuthenticationActionDetails {
                id: "action:checkAuthentication-3".into(),
                redirect_unauthenticated: true,
                redirection_return_url: "https://sso.example.com".into(),
                authentication: Tokens::new(Some("a".into()), Some("i".into()), Some("r".into())),
                redirect_uri: "https://app.example.com".into(),
                client_state: Some("ZW5jb2RlZA==".into()),
            }),
        );
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["details"]["redirectUnauthenticated"], true);
        assert_eq!(value["details"]["authentication"]["accessToken"], "a");
        assert_eq!(value["details"]["clientState"], "ZW5jb2RlZA==");
    }
}
