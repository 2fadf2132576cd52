//! The `refreshTokens` renewal request.

use crate::client::Session;
use crate::error::SsoError;
use crate::models::{ActionPayload, RefreshTokensActionDetails};

/// Ask the broker to renew the current tokens.
///
/// No local state changes until the broker responds.
///
/// # Errors
///
/// Returns [`SsoError::MissingBrokerFrame`] when no frame is registered.
pub fn refresh_tokens_action(
    id: &str,
    session: &Session,
    encoded_client_state: Option<String>,
) -> Result<(), SsoError> {
    super::post_to_broker(
        session,
        ActionPayload::RefreshTokens(RefreshTokensActionDetails {
            id: id.to_owned(),
            authentication: session.state.authentication(),
            client_state: encoded_client_state,
        }),
    )
}
