//! Host environment seams.
//!
//! The bridge never touches a real DOM. The host injects the page context and
//! the broker frame behind these traits; the test suite injects mocks. The
//! broker frame is reached only through [`BrokerFrame::post_message`] — the
//! cross-document messaging boundary — and navigation goes through
//! [`Browser::launch_uri`], the one operation with an awaitable failure
//! (a blocked or refused navigation).

use crate::error::SsoError;
use crate::models::Action;
use crate::storage::KeyValueStorage;
use std::sync::Arc;

/// Page context: current location, history manipulation and navigation
pub trait Browser: Send + Sync {
    /// Full URL of the hosting page, including any query string
    fn current_url(&self) -> String;

    /// Replace the visible URL without reloading the page (history replace)
    fn replace_url(&self, url: &str);

    /// Navigate the current browsing context to `url`
    ///
    /// # Errors
    ///
    /// Returns [`SsoError::Navigation`] when the browser refused or failed to
    /// open the target context (e.g. a blocked popup).
    fn launch_uri(&self, url: &str) -> Result<(), SsoError>;
}

/// The embedded broker frame this client posts action messages to.
///
/// Sends are fire-and-forget, matching `postMessage` with a `"*"` target
/// origin: the payload carries no secrets beyond short-lived tokens already
/// scoped to the relying party, and replies are validated by origin on
/// receipt instead.
pub trait BrokerFrame: Send + Sync {
    /// Post one action message to the broker frame's window
    fn post_message(&self, action: &Action);
}

/// Bundle of page-lifetime host capabilities shared by every component
#[derive(Clone)]
pub struct Environment {
    /// Page context and navigation
    pub browser: Arc<dyn Browser>,
    /// Shared expiring key/value storage
    pub storage: Arc<dyn KeyValueStorage>,
}

impl Environment {
    /// Create an environment from the host's capabilities
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { browser, storage }
    }
}
