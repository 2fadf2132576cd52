//! The `checkAuthentication` decision logic.

use crate::browser::Environment;
use crate::client::Session;
use crate::constants::QS_AUTH_CODE;
use crate::error::SsoError;
use crate::models::response::AuthenticationResponseDetails;
use crate::models::{ActionPayload, AuthenticationActionDetails, CheckAuthenticationOptions, ResponseMessage};
use crate::utils::callbacks::make_callbacks;
use crate::utils::url::query_param;

use super::{authorize_action, redeem_code_action};

/// Check whether the current user is authenticated.
///
/// Three paths:
/// 1. An authorization code sits in the query string — redeem it for tokens.
/// 2. A refresh token exists — ask the broker to verify the current tokens.
/// 3. Neither — the user is unauthenticated; either start the authorization
///    redirect (when the caller asked for it) or resolve locally with a
///    `{success: true, isAuthenticated: false}` response, no broker contact.
///
/// # Errors
///
/// Returns [`SsoError::MissingBrokerFrame`] when a broker post is needed but
/// no frame is registered, or [`SsoError::Navigation`] when the redirect
/// fallback fails to open.
pub fn check_authentication_action(
    id: &str,
    session: &mut Session,
    env: &Environment,
    options: &CheckAuthenticationOptions,
    encoded_client_state: Option<String>,
) -> Result<(), SsoError> {
    let redirect = options.redirect_or_default();

    // 1. attempt code exchange
    if let Some(code) = query_param(&env.browser.current_url(), QS_AUTH_CODE) {
        return redeem_code_action(id, session, env, &code, encoded_client_state);
    }

    // 2. tokens exist
    let authentication = session.state.authentication();
    if authentication
        .as_ref()
        .is_some_and(|tokens| tokens.refresh_token.is_some())
    {
        let authentication = authentication.unwrap_or_default();
        return super::post_to_broker(
            session,
            ActionPayload::CheckAuthentication(AuthenticationActionDetails {
                id: id.to_owned(),
                redirect_unauthenticated: redirect,
                redirection_return_url: session.config.sso_url.clone(),
                authentication,
                redirect_uri: session.config.redirect_uri.clone(),
                client_state: encoded_client_state,
            }),
        );
    }

    // 3. unauthenticated
    log::debug!("unauthenticated");
    if redirect {
        return authorize_action(session, env, encoded_client_state);
    }

    let message = ResponseMessage::CheckAuthentication(AuthenticationResponseDetails {
        id: Some(id.to_owned()),
        success: true,
        is_authenticated: Some(false),
        client_state: encoded_client_state,
        ..AuthenticationResponseDetails::default()
    });
    make_callbacks(id, &mut session.config.callbacks, &message);
    Ok(())
}
