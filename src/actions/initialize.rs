//! The `initialize` handshake.

use crate::client::Session;
use crate::error::SsoError;
use crate::models::{ActionDetails, ActionPayload};

/// Post the initialization handshake to the broker frame.
///
/// As a side effect, performs one eager token-store read so expired entries
/// are evicted before any authentication flow begins.
///
/// # Errors
///
/// Returns [`SsoError::MissingBrokerFrame`] when no frame is registered.
pub fn initialize_action(id: &str, session: &Session) -> Result<(), SsoError> {
    super::post_to_broker(
        session,
        ActionPayload::Initialize(ActionDetails {
            id: id.to_owned(),
            client_state: None,
        }),
    )?;

    let _ = session.state.authentication();
    Ok(())
}
