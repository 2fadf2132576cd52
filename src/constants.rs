//! Protocol-wide constants: storage keys, query-string parameter names and
//! the timing knobs of the activity/refresh loop.

/// Storage key for the access token
pub const AUTH_ACCESS_STORAGE_KEY: &str = "accessToken";

/// Storage key for the id token
pub const AUTH_ID_STORAGE_KEY: &str = "idToken";

/// Storage key for the refresh token
pub const AUTH_REFRESH_STORAGE_KEY: &str = "refreshToken";

/// Storage key for the PKCE code verifier
pub const CODE_VERIFIER_STORAGE_KEY: &str = "codeVerifier";

/// Query-string parameter carrying the client id
pub const QS_CLIENT_ID: &str = "clientId";

/// Query-string parameter carrying the redirect URI
pub const QS_REDIRECT_URI: &str = "redirectUri";

/// Query-string parameter carrying the authorization code
pub const QS_AUTH_CODE: &str = "code";

/// Query-string parameter carrying the encoded client state
pub const QS_STATE: &str = "state";

/// Query-string parameter carrying the PKCE code challenge
pub const QS_CODE_CHALLENGE: &str = "codeChallenge";

/// Number of minutes without recorded activity before the user counts as inactive
pub const DEFAULT_INACTIVE_MINUTES: i64 = 15;

/// How often the activity poll runs, in seconds
pub const POLL_INTERVAL_ACTIVITY_SECONDS: u64 = 60;

/// Minimum spacing between token-expiry checks, in seconds
pub const TOKEN_CHECK_INTERVAL_SECONDS: i64 = 60;

/// Safety margin applied when deciding whether the access token survives
/// until the next scheduled check, in seconds
pub const TOKEN_EXPIRATION_BUFFER_SECONDS: i64 = 30;

/// Lifetime of the persisted PKCE code verifier, in seconds
pub const CODE_VERIFIER_TTL_SECONDS: i64 = 300;

/// Fixed lifetime of the stored refresh token, in days
pub const REFRESH_TOKEN_EXPIRATION_DAYS: i64 = 1;
