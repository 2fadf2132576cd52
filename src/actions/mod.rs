//! Action dispatch: one operation per supported broker action.
//!
//! Each operation either posts a structured [`Action`] to the broker frame,
//! performs a local navigation to the broker's authorization endpoint, or
//! resolves locally through the callback registry without any broker round
//! trip.

mod authorize;
mod check_authentication;
mod initialize;
mod logout;
mod redeem_code;
mod refresh_tokens;

pub use authorize::authorize_action;
pub use check_authentication::check_authentication_action;
pub use initialize::initialize_action;
pub use logout::logout_action;
pub use redeem_code::redeem_code_action;
pub use refresh_tokens::refresh_tokens_action;

use crate::client::Session;
use crate::error::SsoError;
use crate::models::{Action, ActionPayload};

/// Post one action message to the broker frame
pub(crate) fn post_to_broker(session: &Session, payload: ActionPayload) -> Result<(), SsoError> {
    let frame = session.config.frame()?;
    let action = Action::new(session.config.client_id.clone(), payload);
    log::debug!("posting {} action to broker", action.kind());
    frame.post_message(&action);
    Ok(())
}
