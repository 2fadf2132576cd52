//! Inbound message handling: the response side of the broker protocol.
//!
//! Consumes one posted message from the broker frame, correlates it to the
//! action that caused it, mutates token storage and user state exactly once
//! per outcome and forwards the message to the callback registry. Origin
//! filtering happens in the caller ([`crate::client::SsoClient::on_window_message`]),
//! not here.

use crate::actions::authorize_action;
use crate::browser::Environment;
use crate::client::Session;
use crate::constants::{QS_AUTH_CODE, QS_STATE};
use crate::models::{ResponseMessage, Tokens};
use crate::utils::callbacks::make_callbacks;
use crate::utils::url::{query_param, remove_query_param};

/// Handle one message posted by the SSO identity broker.
pub fn handle_message(payload: serde_json::Value, session: &mut Session, env: &Environment) {
    log::debug!("message received: {payload}");

    // not part of the protocol at all: drop without noise
    if payload.get("response").is_none() {
        return;
    }

    let mut message: ResponseMessage = match serde_json::from_value(payload) {
        Ok(message) => message,
        Err(err) => {
            log::debug!("invalid message response received: {err}");
            return;
        }
    };

    if let Some(user) = message.user().cloned() {
        session.state.set_user(user);
    }

    // The client state was encoded outbound by this client and the broker
    // passes it back untouched. A value on the query string means we arrived
    // here via redirect and it wins over the one embedded in the response.
    let qs_state = query_param(&env.browser.current_url(), QS_STATE);
    let effective_client_state = qs_state
        .clone()
        .or_else(|| message.client_state().map(ToOwned::to_owned));
    if qs_state.is_some() {
        message.set_client_state(qs_state);
    }

    match &message {
        ResponseMessage::Initialized(details) => {
            make_callbacks(
                details.id.as_deref().unwrap_or_default(),
                &mut session.config.callbacks,
                &message,
            );
        }
        ResponseMessage::CheckAuthentication(details)
        | ResponseMessage::RedeemCode(details)
        | ResponseMessage::RefreshTokens(details) => {
            if details.success && details.is_authenticated.unwrap_or(false) {
                if let Some(authentication) = details.authentication.as_ref() {
                    handle_authentication_updated(authentication, session, env);
                }
            }
            make_callbacks(
                details.id.as_deref().unwrap_or_default(),
                &mut session.config.callbacks,
                &message,
            );
        }
        ResponseMessage::Logout(details) => {
            if details.success {
                session.state.clear_authentication();
            }
            make_callbacks(
                details.id.as_deref().unwrap_or_default(),
                &mut session.config.callbacks,
                &message,
            );
        }
        ResponseMessage::RedirectToLogin(_) => {
            if let Err(err) = authorize_action(session, env, effective_client_state) {
                log::error!("redirect to login failed: {err}");
            }
        }
    }
}

/// Persist a fresh authentication and clean the consumed query parameters off
/// the visible URL.
///
/// The code/state parameters are stripped first (history replace, only when
/// the URL actually changed); tokens are written only when an access token is
/// present.
fn handle_authentication_updated(authentication: &Tokens, session: &mut Session, env: &Environment) {
    remove_processed_params(env);

    if authentication.access_token.is_none() {
        return;
    }
    session.state.token_store().set(authentication);
}

fn remove_processed_params(env: &Environment) {
    let current = env.browser.current_url();
    let url = remove_query_param(&current, QS_AUTH_CODE);
    let url = remove_query_param(&url, QS_STATE);
    if url != current {
        env.browser.replace_url(&url);
    }
}
