//! The authorization redirect flow (PKCE).

use crate::browser::Environment;
use crate::client::Session;
use crate::constants::{CODE_VERIFIER_STORAGE_KEY, CODE_VERIFIER_TTL_SECONDS, QS_CODE_CHALLENGE, QS_STATE};
use crate::error::SsoError;
use crate::storage::{set_with_expiration, StorageTtl};
use crate::utils::crypto::{generate_challenge, generate_random};
use crate::utils::url::build_broker_url;

/// Initiate the authentication process by redirecting the user to the broker.
///
/// Generates a 128-character PKCE verifier, persists it under a bounded TTL,
/// derives the challenge and navigates to the broker's authorization endpoint
/// with client id, redirect URI, the challenge and the encoded client state.
///
/// # Errors
///
/// Returns [`SsoError::Navigation`] when the browser refused or failed to
/// open the target context.
pub fn authorize_action(
    session: &Session,
    env: &Environment,
    encoded_client_state: Option<String>,
) -> Result<(), SsoError> {
    let code_verifier = generate_random(128);
    set_with_expiration(
        env.storage.as_ref(),
        CODE_VERIFIER_STORAGE_KEY,
        &code_verifier,
        StorageTtl::Seconds(CODE_VERIFIER_TTL_SECONDS),
    );
    let code_challenge = generate_challenge(&code_verifier);

    let mut params = vec![(QS_CODE_CHALLENGE, code_challenge.as_str())];
    if let Some(client_state) = encoded_client_state.as_deref() {
        params.push((QS_STATE, client_state));
    }

    let url = build_broker_url(&session.config, None, &params);
    env.browser.launch_uri(&url)
}
