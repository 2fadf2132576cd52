//! The `redeemCode` exchange.

use crate::browser::Environment;
use crate::client::Session;
use crate::constants::CODE_VERIFIER_STORAGE_KEY;
use crate::error::SsoError;
use crate::models::{ActionPayload, RedeemCodeActionDetails};
use crate::storage::get_with_expiration;

/// Exchange an authorization code for tokens.
///
/// Reads back the persisted PKCE verifier, posts the exchange request and
/// removes the verifier afterwards — single-use, regardless of how the
/// exchange eventually turns out; the broker reports success or failure
/// asynchronously through the response channel.
///
/// # Errors
///
/// Returns [`SsoError::MissingBrokerFrame`] when no frame is registered.
pub fn redeem_code_action(
    id: &str,
    session: &Session,
    env: &Environment,
    code: &str,
    encoded_client_state: Option<String>,
) -> Result<(), SsoError> {
    let code_verifier = get_with_expiration(env.storage.as_ref(), CODE_VERIFIER_STORAGE_KEY);
    log::info!("redeeming code {code}");
    log::debug!("code verifier present: {}", code_verifier.is_some());

    super::post_to_broker(
        session,
        ActionPayload::RedeemCode(RedeemCodeActionDetails {
            id: id.to_owned(),
            code: code.to_owned(),
            code_verifier,
            redirect_uri: session.config.redirect_uri.clone(),
            client_id: session.config.client_id.clone(),
            client_state: encoded_client_state,
        }),
    )?;

    env.storage.remove_item(CODE_VERIFIER_STORAGE_KEY);
    Ok(())
}
