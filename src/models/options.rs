//! Per-operation option records.

use crate::utils::logging::LogLevel;
use serde::{Deserialize, Serialize};

/// Options accepted by [`crate::client::SsoClient::initialize`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeOptions {
    /// Keep the user's tokens refreshed automatically while they are active
    pub auto_refresh: bool,

    /// Log verbosity; missing or invalid values fall back to `info`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
}

impl Default for InitializeOptions {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            log_level: None,
        }
    }
}

/// Options accepted by [`crate::client::SsoClient::check_authentication`]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckAuthenticationOptions {
    /// Redirect to the identity broker when the user is not authenticated.
    /// Unset means `true`.
    pub redirect: Option<bool>,
}

impl CheckAuthenticationOptions {
    /// The effective redirect preference
    #[must_use]
    pub fn redirect_or_default(&self) -> bool {
        self.redirect.unwrap_or(true)
    }
}

/// Options accepted by [`crate::client::SsoClient::logout`]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoutOptions {
    /// Log out of just the client app instead of the whole SSO session
    pub client_only: bool,

    /// Redirect to the identity broker after logout. Unset means `true`.
    pub redirect: Option<bool>,
}

impl LogoutOptions {
    /// The effective redirect preference
    #[must_use]
    pub fn redirect_or_default(&self) -> bool {
        self.redirect.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_defaults_enable_auto_refresh() {
        let options = InitializeOptions::default();
        assert!(options.auto_refresh);
        assert_eq!(options.log_level, None);
    }

    #[test]
    fn redirect_defaults_to_true_when_unset() {
        assert!(CheckAuthenticationOptions::default().redirect_or_default());
        assert!(LogoutOptions::default().redirect_or_default());
        let explicit = CheckAuthenticationOptions {
            redirect: Some(false),
        };
        assert!(!explicit.redirect_or_default());
    }
}
