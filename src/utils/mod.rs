//! Shared utilities: correlation callbacks, client-state codec, PKCE crypto,
//! JWT payload inspection, URL helpers and log-level handling.

pub mod callbacks;
pub mod client_state;
pub mod crypto;
pub mod jwt;
pub mod logging;
pub mod url;

pub use crypto::{generate_challenge, generate_random};
pub use jwt::{parse_token, token_expiration};
pub use url::build_broker_url;
