//! Session state: persisted tokens and the in-memory user.

use crate::browser::Environment;
use crate::constants::{
    AUTH_ACCESS_STORAGE_KEY, AUTH_ID_STORAGE_KEY, AUTH_REFRESH_STORAGE_KEY,
    REFRESH_TOKEN_EXPIRATION_DAYS,
};
use crate::models::{Tokens, User};
use crate::storage::{get_with_expiration, set_with_expiration, KeyValueStorage, StorageTtl};
use crate::utils::jwt::token_expiration;
use std::sync::Arc;

/// Persistence for the session token triple, layered over the expiring store.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenStore {
    /// Create a store over the shared expiring storage
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the persisted tokens.
    ///
    /// Returns `None` when all three are absent or expired; entries past
    /// their expiration are evicted as a side effect of the read.
    #[must_use]
    pub fn get(&self) -> Option<Tokens> {
        let refresh_token = get_with_expiration(self.storage.as_ref(), AUTH_REFRESH_STORAGE_KEY);
        let access_token = get_with_expiration(self.storage.as_ref(), AUTH_ACCESS_STORAGE_KEY);
        let id_token = get_with_expiration(self.storage.as_ref(), AUTH_ID_STORAGE_KEY);
        if refresh_token.is_none() && access_token.is_none() && id_token.is_none() {
            return None;
        }
        Some(Tokens::new(access_token, id_token, refresh_token))
    }

    /// Persist a token triple.
    ///
    /// The access token's `exp` claim drives the TTL of the access and id
    /// entries; the refresh token gets a fixed one-day TTL. An undecodable
    /// access token writes nothing at all — no partial state.
    pub fn set(&self, authentication: &Tokens) {
        let Some(expiration) = authentication
            .access_token
            .as_deref()
            .and_then(token_expiration)
        else {
            return;
        };
        if let Some(access_token) = authentication.access_token.as_deref() {
            set_with_expiration(
                self.storage.as_ref(),
                AUTH_ACCESS_STORAGE_KEY,
                access_token,
                StorageTtl::Until(expiration),
            );
        }
        if let Some(id_token) = authentication.id_token.as_deref() {
            set_with_expiration(
                self.storage.as_ref(),
                AUTH_ID_STORAGE_KEY,
                id_token,
                StorageTtl::Until(expiration),
            );
        }
        if let Some(refresh_token) = authentication.refresh_token.as_deref() {
            set_with_expiration(
                self.storage.as_ref(),
                AUTH_REFRESH_STORAGE_KEY,
                refresh_token,
                StorageTtl::Seconds(60 * 60 * 24 * REFRESH_TOKEN_EXPIRATION_DAYS),
            );
        }
    }

    /// Remove all three token entries; safe to call repeatedly
    pub fn clear(&self) {
        self.storage.remove_item(AUTH_ACCESS_STORAGE_KEY);
        self.storage.remove_item(AUTH_ID_STORAGE_KEY);
        self.storage.remove_item(AUTH_REFRESH_STORAGE_KEY);
    }
}

/// Authentication state for the client app.
///
/// Tokens are always read live from the store, never cached here. The user is
/// owned and frozen: installed whole from a broker response, replaced or
/// cleared, never edited.
pub struct AuthenticationState {
    token_store: TokenStore,
    user: Option<User>,
}

impl AuthenticationState {
    /// Fresh state over the shared storage, with no user
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            token_store: TokenStore::new(storage),
            user: None,
        }
    }

    /// Fresh state over an environment's storage
    #[must_use]
    pub fn for_environment(env: &Environment) -> Self {
        Self::new(Arc::clone(&env.storage))
    }

    /// The current tokens, read live from storage
    #[must_use]
    pub fn authentication(&self) -> Option<Tokens> {
        self.token_store.get()
    }

    /// The current user, when one has been installed
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Install a user received from the broker, replacing any previous one
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Clear both the persisted tokens and the in-memory user
    pub fn clear_authentication(&mut self) {
        self.token_store.clear();
        self.user = None;
    }

    /// The token persistence layer
    #[must_use]
    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::fixtures::forge_token;
    use chrono::Utc;
    use serde_json::json;

    fn store() -> (TokenStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let shared: Arc<dyn KeyValueStorage> = storage.clone();
        (TokenStore::new(shared), storage)
    }

    #[test]
    fn set_then_get_returns_the_same_triple() {
        let (store, _) = store();
        let tokens = Tokens::new(
            Some(forge_token(Utc::now().timestamp() + 3600)),
            Some("id-token".into()),
            Some("refresh-token".into()),
        );
        store.set(&tokens);
        assert_eq!(store.get(), Some(tokens));
    }

    #[test]
    fn an_undecodable_access_token_writes_nothing() {
        let (store, storage) = store();
        store.set(&Tokens::new(
            Some("not-a-jwt".into()),
            Some("id-token".into()),
            Some("refresh-token".into()),
        ));
        assert_eq!(store.get(), None);
        assert!(storage.is_empty(), "no partial write");
    }

    #[test]
    fn clear_removes_everything_and_is_idempotent() {
        let (store, _) = store();
        store.set(&Tokens::new(
            Some(forge_token(Utc::now().timestamp() + 3600)),
            Some("id-token".into()),
            Some("refresh-token".into()),
        ));
        store.clear();
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn an_expired_access_token_is_evicted_on_read() {
        let (store, storage) = store();
        store.set(&Tokens::new(
            Some(forge_token(Utc::now().timestamp() - 10)),
            Some("id-token".into()),
            Some("refresh-token".into()),
        ));
        let survivors = store.get().unwrap();
        assert_eq!(survivors.access_token, None);
        assert_eq!(survivors.id_token, None);
        assert_eq!(survivors.refresh_token.as_deref(), Some("refresh-token"));
        assert_eq!(storage.get_item(crate::constants::AUTH_ACCESS_STORAGE_KEY), None);
    }

    #[test]
    fn refresh_token_gets_a_one_day_ttl() {
        let (store, storage) = store();
        store.set(&Tokens::new(
            Some(forge_token(Utc::now().timestamp() + 60)),
            None,
            Some("refresh-token".into()),
        ));
        let raw = storage.get_item(crate::constants::AUTH_REFRESH_STORAGE_KEY).unwrap();
        let entry: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let expiration = entry["expiration"].as_i64().unwrap();
        let day_from_now = Utc::now().timestamp_millis() + 24 * 60 * 60 * 1000;
        assert!((expiration - day_from_now).abs() < 5000, "roughly one day out");
    }

    #[test]
    fn state_clears_tokens_and_user_together() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut state = AuthenticationState::new(storage);
        state.token_store().set(&Tokens::new(
            Some(forge_token(Utc::now().timestamp() + 3600)),
            None,
            Some("refresh-token".into()),
        ));
        state.set_user(User::new(json!({"email": "a@b.c"})));
        assert!(state.authentication().is_some());
        assert!(state.user().is_some());

        state.clear_authentication();
        assert_eq!(state.authentication(), None);
        assert!(state.user().is_none());
    }
}
