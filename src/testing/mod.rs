//! Testing utilities: mock host environments and pre-built fixtures.
//!
//! Available to unit tests and, behind the `testing` feature, to integration
//! tests and downstream consumers that want to exercise the bridge without a
//! real browser.
//!
//! - [`mock`] - mock implementations of the host seams
//! - [`fixtures`] - pre-built tokens, responses and wired-up clients

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{MockBrokerFrame, MockBrowser};

/// Common test constants
pub mod constants {
    /// Default broker URL used by fixtures
    pub const TEST_SSO_URL: &str = "https://sso.example.com";

    /// Default client id used by fixtures
    pub const TEST_CLIENT_ID: &str = "test-client";

    /// Default redirect URI used by fixtures
    pub const TEST_REDIRECT_URI: &str = "https://app.example.com/";

    /// Default page URL used by fixtures
    pub const TEST_PAGE_URL: &str = "https://app.example.com/dashboard";
}
