//! Pre-built test data and wired-up clients.

use crate::client::SsoClient;
use crate::models::Tokens;
use crate::storage::MemoryStorage;
use crate::testing::constants::{TEST_CLIENT_ID, TEST_PAGE_URL, TEST_REDIRECT_URI, TEST_SSO_URL};
use crate::testing::mock::{MockBrokerFrame, MockBrowser};
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use std::sync::Arc;

/// Forge an unsigned JWT whose payload carries the given `exp` claim.
///
/// The broker's tokens are never signature-checked by this client, so an
/// unsigned token is indistinguishable from a real one here.
#[must_use]
pub fn forge_token(exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload =
        general_purpose::URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"user-1","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

/// A fully wired client plus handles to its mocks
pub struct TestClient {
    /// The client under test
    pub client: SsoClient,
    /// The scripted page context
    pub browser: Arc<MockBrowser>,
    /// The recording broker frame
    pub frame: Arc<MockBrokerFrame>,
    /// The backing store
    pub storage: Arc<MemoryStorage>,
}

/// Pre-built test data
pub struct TestFixtures;

impl TestFixtures {
    /// A token triple whose access token expires `seconds_from_now` from now
    #[must_use]
    pub fn tokens(seconds_from_now: i64) -> Tokens {
        Tokens::new(
            Some(forge_token(Utc::now().timestamp() + seconds_from_now)),
            Some(forge_token(Utc::now().timestamp() + seconds_from_now)),
            Some("refresh-token".to_owned()),
        )
    }

    /// An uninitialized client over fresh mocks
    #[must_use]
    pub fn client() -> TestClient {
        let browser = Arc::new(MockBrowser::new(TEST_PAGE_URL));
        let frame = Arc::new(MockBrokerFrame::new());
        let storage = Arc::new(MemoryStorage::new());
        let browser_seam: Arc<dyn crate::browser::Browser> = browser.clone();
        let storage_seam: Arc<dyn crate::storage::KeyValueStorage> = storage.clone();
        let client = SsoClient::new(browser_seam, storage_seam);
        TestClient {
            client,
            browser,
            frame,
            storage,
        }
    }

    /// A client that has completed `initialize` with the default options
    ///
    /// # Panics
    ///
    /// Panics if initialization fails, which would mean broken fixtures.
    #[must_use]
    pub fn initialized_client() -> TestClient {
        let fixture = Self::client();
        let frame_seam: Arc<dyn crate::browser::BrokerFrame> = fixture.frame.clone();
        fixture
            .client
            .initialize(
                TEST_SSO_URL,
                TEST_CLIENT_ID,
                TEST_REDIRECT_URI,
                Some(frame_seam),
                None,
                None,
            )
            .expect("fixture initialization succeeds");
        fixture
    }
}
