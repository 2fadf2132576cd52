//! Error types for the SSO bridge.
//!
//! Only local, synchronous pre-flight failures surface as errors. Broker-side
//! failures travel back through the response channel as data (`success` /
//! `error` fields) and are never raised here.

use thiserror::Error;

/// Errors raised by the client-side bridge itself
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SsoError {
    /// `initialize` was called without a client id
    #[error("clientId is required")]
    MissingClientId,

    /// `initialize` was called without a redirect URI
    #[error("redirectUri is required")]
    MissingRedirectUri,

    /// An operation needed to post to the broker frame, but none is registered
    #[error("no broker frame registered")]
    MissingBrokerFrame,

    /// The browser failed to open the target context (e.g. popup blocked)
    #[error("navigation to {url} failed")]
    Navigation {
        /// URL the browser refused to open
        url: String,
    },
}
