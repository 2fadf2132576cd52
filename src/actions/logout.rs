//! The `logout` request.

use crate::client::Session;
use crate::error::SsoError;
use crate::models::{ActionPayload, LogoutActionDetails};

/// Log the current user out.
///
/// Local authentication state and user are cleared immediately and
/// synchronously — client-local logout happens whatever the broker round
/// trip later reports — then the server-side logout request is posted.
///
/// # Errors
///
/// Returns [`SsoError::MissingBrokerFrame`] when no frame is registered; the
/// local state is cleared regardless.
pub fn logout_action(
    id: &str,
    session: &mut Session,
    client_only_logout: bool,
    redirect_to_login: bool,
    encoded_client_state: Option<String>,
) -> Result<(), SsoError> {
    session.state.clear_authentication();

    super::post_to_broker(
        session,
        ActionPayload::Logout(LogoutActionDetails {
            id: id.to_owned(),
            redirect_unauthenticated: redirect_to_login,
            redirect_uri: session.config.redirect_uri.clone(),
            client_state: encoded_client_state,
            client_only_logout,
        }),
    )
}
