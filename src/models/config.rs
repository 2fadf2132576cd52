//! Per-initialization client configuration.

use crate::browser::BrokerFrame;
use crate::models::InitializeOptions;
use crate::utils::callbacks::FunctionCallbacks;
use std::sync::Arc;

/// Configuration for one `initialize` call.
///
/// A fresh instance replaces the previous one on every re-initialization —
/// including the callback registry, so callbacks registered against an older
/// configuration are discarded wholesale.
pub struct ClientConfig {
    /// The designated client id for the app
    pub client_id: String,

    /// A registered redirect URI for the client app
    pub redirect_uri: String,

    /// Base URL of the SSO broker site, without trailing slash
    pub sso_url: String,

    /// Handle to the frame hosting the broker component
    pub frame: Option<Arc<dyn BrokerFrame>>,

    /// Options supplied to `initialize`, merged over defaults
    pub options: InitializeOptions,

    /// Registered response callbacks, keyed by callback id
    pub callbacks: FunctionCallbacks,
}

impl ClientConfig {
    /// A blank configuration with default options and no registered callbacks
    #[must_use]
    pub fn new() -> Self {
        Self {
            client_id: String::new(),
            redirect_uri: String::new(),
            sso_url: String::new(),
            frame: None,
            options: InitializeOptions::default(),
            callbacks: FunctionCallbacks::new(),
        }
    }

    /// The broker frame, required for any operation that posts a message
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SsoError::MissingBrokerFrame`] when no frame
    /// was registered at initialization.
    pub fn frame(&self) -> Result<&Arc<dyn BrokerFrame>, crate::error::SsoError> {
        self.frame
            .as_ref()
            .ok_or(crate::error::SsoError::MissingBrokerFrame)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
