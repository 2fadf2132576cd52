//! The session façade.
//!
//! [`SsoClient`] is the public entry point: it owns the configuration and
//! authentication state (one explicit [`Session`] object, replaced wholesale
//! on every `initialize`), wires the activity monitor to the token-refresh
//! decision and exposes the broker operations as methods.
//!
//! All methods take `&self`; state lives behind internal locks so the host
//! can share one client with the poll driver and its message plumbing.
//! Registered callbacks are invoked while the session lock is held and must
//! not call back into the same client.

use crate::actions::{
    authorize_action, check_authentication_action, initialize_action, logout_action,
    redeem_code_action, refresh_tokens_action,
};
use crate::activity::{ActivityCallbacks, ActivityMonitor};
use crate::browser::{BrokerFrame, Browser, Environment};
use crate::constants::{
    POLL_INTERVAL_ACTIVITY_SECONDS, TOKEN_CHECK_INTERVAL_SECONDS, TOKEN_EXPIRATION_BUFFER_SECONDS,
};
use crate::error::SsoError;
use crate::handler::handle_message;
use crate::models::{
    CheckAuthenticationOptions, ClientConfig, InitializeOptions, LogoutOptions, Tokens, User,
};
use crate::session::AuthenticationState;
use crate::storage::KeyValueStorage;
use crate::utils::callbacks::{create_callback_id, ResponseCallback};
use crate::utils::client_state::prepare;
use crate::utils::jwt::token_expiration;
use crate::utils::url::{page_origin, remove_trailing_slash};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything scoped to one `initialize` call: configuration, authentication
/// state and the auto-refresh bookkeeping.
pub struct Session {
    /// Configuration for the current initialization
    pub config: ClientConfig,
    /// Persisted tokens plus the in-memory user
    pub state: AuthenticationState,
    /// When the refresh decision last ran
    pub last_token_check: Option<DateTime<Utc>>,
    /// Correlation id handed out by `initialize`, replayed by `frame_loaded`
    pub initialize_action_id: Option<String>,
}

impl Session {
    /// A blank session over the shared storage
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            config: ClientConfig::new(),
            state: AuthenticationState::new(storage),
            last_token_check: None,
            initialize_action_id: None,
        }
    }
}

/// Client-side bridge to an embedded SSO identity broker.
pub struct SsoClient {
    session: Arc<Mutex<Session>>,
    monitor: Arc<Mutex<ActivityMonitor>>,
    env: Environment,
    refresh_driver: Mutex<Option<JoinHandle<()>>>,
}

impl SsoClient {
    /// Create a client over the host's page context and storage.
    ///
    /// The client is inert until [`initialize`](Self::initialize) runs.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, storage: Arc<dyn KeyValueStorage>) -> Self {
        let env = Environment::new(browser, Arc::clone(&storage));
        Self {
            session: Arc::new(Mutex::new(Session::new(storage))),
            monitor: Arc::new(Mutex::new(ActivityMonitor::new())),
            env,
            refresh_driver: Mutex::new(None),
        }
    }

    /// Initialize authentication communication.
    ///
    /// Validates the required arguments, replaces the session (configuration,
    /// state and registered callbacks) with fresh instances, wires the
    /// activity monitor to the refresh decision and registers the optional
    /// `callback` under a temporary id keyed to the `initialize` action. The
    /// returned id correlates the broker's `initialized` reply; the action
    /// itself is posted once the host reports the frame ready via
    /// [`frame_loaded`](Self::frame_loaded).
    ///
    /// # Errors
    ///
    /// Returns [`SsoError::MissingClientId`] or
    /// [`SsoError::MissingRedirectUri`] when either required argument is
    /// empty. Nothing is sent in that case.
    pub fn initialize(
        &self,
        sso_url: &str,
        client_id: &str,
        redirect_uri: &str,
        frame: Option<Arc<dyn BrokerFrame>>,
        options: Option<InitializeOptions>,
        callback: Option<ResponseCallback>,
    ) -> Result<String, SsoError> {
        if client_id.is_empty() {
            return Err(SsoError::MissingClientId);
        }
        if redirect_uri.is_empty() {
            return Err(SsoError::MissingRedirectUri);
        }

        // merge the caller's options over defaults
        let mut options = options.unwrap_or_default();
        let log_level = options.log_level.unwrap_or_default();
        options.log_level = Some(log_level);
        log::set_max_level(log_level.to_level_filter());

        let auto_refresh = options.auto_refresh;
        {
            let mut session = lock(&self.session);
            let mut config = ClientConfig::new();
            config.client_id = client_id.to_owned();
            config.redirect_uri = redirect_uri.to_owned();
            config.sso_url = remove_trailing_slash(sso_url).to_owned();
            config.frame = frame;
            config.options = options;
            session.config = config;
            session.state = AuthenticationState::for_environment(&self.env);
            session.last_token_check = if auto_refresh { Some(Utc::now()) } else { None };
            session.initialize_action_id = None;
        }

        {
            let mut monitor = lock(&self.monitor);
            let session = Arc::clone(&self.session);
            let env = self.env.clone();
            monitor.init(ActivityCallbacks {
                on_active_interval: Some(Box::new(move || {
                    let mut session = lock(&session);
                    let _ = handle_user_activity(&mut session, &env, true);
                })),
            });
            if auto_refresh {
                monitor.start();
            }
        }
        if auto_refresh {
            self.spawn_refresh_driver();
        }

        let action_id = self.register_temporary_callback(callback, "initialize");
        lock(&self.session).initialize_action_id = Some(action_id.clone());
        Ok(action_id)
    }

    /// Report that the broker frame finished loading; sends the `initialize`
    /// action under the id returned by [`initialize`](Self::initialize).
    pub fn frame_loaded(&self) {
        let session = lock(&self.session);
        let Some(action_id) = session.initialize_action_id.clone() else {
            log::warn!("frame loaded before initialize was called");
            return;
        };
        if let Err(err) = initialize_action(&action_id, &session) {
            log::error!("failed to send initialize action: {err}");
        }
    }

    /// Register a callback that receives every message from the broker.
    ///
    /// An empty `id` is ignored. The handler runs with the session lock held
    /// and must not call back into this client.
    pub fn register_callback(&self, id: &str, callback: ResponseCallback) {
        if id.is_empty() {
            return;
        }
        let mut session = lock(&self.session);
        session.config.callbacks.insert(id.to_owned(), callback);
        log::debug!(
            "registered callback: {id} (total: {})",
            session.config.callbacks.len()
        );
    }

    /// Unregister a callback by its id
    pub fn unregister_callback(&self, id: &str) {
        if id.is_empty() {
            return;
        }
        let mut session = lock(&self.session);
        session.config.callbacks.remove(id);
        log::debug!(
            "unregistered callback: {id} (total: {})",
            session.config.callbacks.len()
        );
    }

    /// Initiate the authentication redirect flow for the user
    ///
    /// # Errors
    ///
    /// Returns [`SsoError::Navigation`] when the browser refused the redirect.
    pub fn authorize(&self, client_state: Option<&Value>) -> Result<(), SsoError> {
        let encoded = prepare(client_state, &self.env.browser.current_url());
        let session = lock(&self.session);
        authorize_action(&session, &self.env, Some(encoded))
    }

    /// Exchange an authentication code for tokens
    ///
    /// # Errors
    ///
    /// Returns [`SsoError::MissingBrokerFrame`] when no frame is registered.
    pub fn redeem_authentication_code(
        &self,
        code: &str,
        client_state: Option<&Value>,
        callback: Option<ResponseCallback>,
    ) -> Result<String, SsoError> {
        let encoded = prepare(client_state, &self.env.browser.current_url());
        let id = self.register_temporary_callback(callback, "redeemCode");
        let session = lock(&self.session);
        redeem_code_action(&id, &session, &self.env, code, Some(encoded))?;
        Ok(id)
    }

    /// Check whether the current user is authenticated
    ///
    /// # Errors
    ///
    /// Returns [`SsoError::MissingBrokerFrame`] when a broker post is needed
    /// but no frame is registered, or [`SsoError::Navigation`] when the
    /// unauthenticated-redirect fallback fails to open.
    pub fn check_authentication(
        &self,
        options: CheckAuthenticationOptions,
        client_state: Option<&Value>,
        callback: Option<ResponseCallback>,
    ) -> Result<String, SsoError> {
        let encoded = prepare(client_state, &self.env.browser.current_url());
        let id = self.register_temporary_callback(callback, "checkAuthentication");
        let mut session = lock(&self.session);
        check_authentication_action(&id, &mut session, &self.env, &options, Some(encoded))?;
        Ok(id)
    }

    /// Log the user out. Local state is cleared synchronously whatever the
    /// broker later reports.
    ///
    /// # Errors
    ///
    /// Returns [`SsoError::MissingBrokerFrame`] when no frame is registered;
    /// local state is cleared regardless.
    pub fn logout(
        &self,
        options: LogoutOptions,
        client_state: Option<&Value>,
        callback: Option<ResponseCallback>,
    ) -> Result<String, SsoError> {
        let encoded = prepare(client_state, &self.env.browser.current_url());
        let id = self.register_temporary_callback(callback, "logout");
        let mut session = lock(&self.session);
        logout_action(
            &id,
            &mut session,
            options.client_only,
            options.redirect_or_default(),
            Some(encoded),
        )?;
        Ok(id)
    }

    /// Ask the broker to renew the current tokens
    ///
    /// # Errors
    ///
    /// Returns [`SsoError::MissingBrokerFrame`] when no frame is registered.
    pub fn refresh_tokens(
        &self,
        client_state: Option<&Value>,
        callback: Option<ResponseCallback>,
    ) -> Result<String, SsoError> {
        let encoded = prepare(client_state, &self.env.browser.current_url());
        let id = self.register_temporary_callback(callback, "refreshTokens");
        let session = lock(&self.session);
        refresh_tokens_action(&id, &session, Some(encoded))?;
        Ok(id)
    }

    /// Entry point for window `message` events.
    ///
    /// Events from the page's own origin are dropped silently (self-sent);
    /// events from any origin other than the configured broker are logged and
    /// dropped; only broker-origin events reach the response handler.
    pub fn on_window_message(&self, origin: &str, payload: Value) {
        let mut session = lock(&self.session);
        if page_origin(&self.env.browser.current_url()).as_deref() == Some(origin) {
            return;
        }
        if origin == session.config.sso_url {
            handle_message(payload, &mut session, &self.env);
        } else {
            log::warn!(
                "posted message origin does not match expected, stop processing (expected: {}, actual: {origin})",
                session.config.sso_url
            );
        }
    }

    /// Forward one DOM interaction event to the activity monitor
    pub fn notify_activity(&self, event: &str) {
        lock(&self.monitor).record_event(event);
    }

    /// Run one activity poll tick. The interval driver calls this every
    /// 60 seconds while auto-refresh is on; hosts without an async runtime
    /// call it from their own timer.
    pub fn poll_activity(&self) {
        let mut monitor = lock(&self.monitor);
        if monitor.is_running() {
            monitor.activity_fn();
        }
    }

    /// Whether the last activity poll found the user active
    #[must_use]
    pub fn is_user_active(&self) -> bool {
        lock(&self.monitor).is_active()
    }

    /// The client id for the app
    #[must_use]
    pub fn client_id(&self) -> String {
        lock(&self.session).config.client_id.clone()
    }

    /// The registered client redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        lock(&self.session).config.redirect_uri.clone()
    }

    /// The URL of the SSO broker site
    #[must_use]
    pub fn sso_url(&self) -> String {
        lock(&self.session).config.sso_url.clone()
    }

    /// The frame hosting the broker component, when registered
    #[must_use]
    pub fn frame(&self) -> Option<Arc<dyn BrokerFrame>> {
        lock(&self.session).config.frame.clone()
    }

    /// Ids of the currently registered callbacks
    #[must_use]
    pub fn callback_ids(&self) -> Vec<String> {
        lock(&self.session).config.callbacks.keys().cloned().collect()
    }

    /// The current tokens, read live from storage
    #[must_use]
    pub fn authentication(&self) -> Option<Tokens> {
        lock(&self.session).state.authentication()
    }

    /// The current user, when one has been installed
    #[must_use]
    pub fn user(&self) -> Option<User> {
        lock(&self.session).state.user().cloned()
    }

    fn register_temporary_callback(&self, callback: Option<ResponseCallback>, action: &str) -> String {
        let id = create_callback_id(action);
        if let Some(callback) = callback {
            self.register_callback(&id, callback);
        }
        id
    }

    fn spawn_refresh_driver(&self) {
        let mut driver = lock(&self.refresh_driver);
        if let Some(previous) = driver.take() {
            previous.abort();
        }
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let monitor = Arc::clone(&self.monitor);
                *driver = Some(runtime.spawn(async move {
                    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(
                        POLL_INTERVAL_ACTIVITY_SECONDS,
                    ));
                    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                    loop {
                        ticker.tick().await;
                        let mut monitor = lock(&monitor);
                        if monitor.is_running() {
                            monitor.activity_fn();
                        }
                    }
                }));
            }
            Err(_) => {
                log::warn!("no async runtime available; drive token refresh manually via poll_activity");
            }
        }
    }
}

impl Drop for SsoClient {
    fn drop(&mut self) {
        if let Some(driver) = lock(&self.refresh_driver).take() {
            driver.abort();
        }
    }
}

/// Decide whether a silent token renewal is due, and dispatch it.
///
/// Returns `true` only when a `refreshTokens` action was actually posted.
/// Gates, in order: auto-refresh enabled, user active, at least the check
/// interval elapsed since the last decision. A token set missing its access
/// or id token requires a refresh outright; a missing refresh token cannot be
/// refreshed at all and falls back to the authorization redirect. Otherwise
/// the access token must survive until the next check (plus buffer) or a
/// refresh is required.
pub fn handle_user_activity(session: &mut Session, env: &Environment, monitor_active: bool) -> bool {
    let now = Utc::now();
    let elapsed = now - session.last_token_check.unwrap_or(DateTime::UNIX_EPOCH);
    if !session.config.options.auto_refresh
        || !monitor_active
        || elapsed <= Duration::seconds(TOKEN_CHECK_INTERVAL_SECONDS)
    {
        return false;
    }

    session.last_token_check = Some(now);
    let tokens = session.state.authentication();
    let mut refresh_required = tokens
        .as_ref()
        .is_some_and(|tokens| tokens.access_token.is_none() || tokens.id_token.is_none());

    let Some(tokens) = tokens.filter(|tokens| tokens.refresh_token.is_some()) else {
        log::warn!("unable to refresh -- no refresh token");
        if let Err(err) = authorize_action(session, env, None) {
            log::error!("authorization redirect failed: {err}");
        }
        return false;
    };

    if !refresh_required {
        // require a refresh unless the token outlives the next check plus buffer
        let next_check =
            now + Duration::seconds(TOKEN_CHECK_INTERVAL_SECONDS + TOKEN_EXPIRATION_BUFFER_SECONDS);
        refresh_required = tokens
            .access_token
            .as_deref()
            .and_then(token_expiration)
            .map_or(true, |expiration| next_check >= expiration);
    }

    if refresh_required {
        log::info!("token refresh is required");
        let id = create_callback_id("auto-refresh-token");
        if let Err(err) = refresh_tokens_action(&id, session, None) {
            log::error!("token refresh dispatch failed: {err}");
            return false;
        }
        return true;
    }

    false
}
