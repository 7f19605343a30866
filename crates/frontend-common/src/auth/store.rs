//! Injectable session-state store
//!
//! Holds the signed-in account and its token in memory, writing every change
//! through to a pluggable credential storage. Storage is only read back
//! during `hydrate`; all logic decisions run against the in-memory state.

use crate::config::AuthConfig;
use gloo::storage::Storage as _;
use pms_http::types::{Role, User};

/// Persistence seam for the session store. The browser implementation is
/// local storage; tests inject an in-memory map.
pub trait CredentialStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Credential storage backed by browser local storage
#[derive(Clone, Debug, Default)]
pub struct BrowserStorage;

impl CredentialStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        gloo::storage::LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let _ = gloo::storage::LocalStorage::raw().set_item(key, value);
    }

    fn remove(&self, key: &str) {
        let _ = gloo::storage::LocalStorage::raw().remove_item(key);
    }
}

/// Session state with write-through persistence
#[derive(Clone, Debug)]
pub struct SessionStore<S: CredentialStorage> {
    user: Option<User>,
    token: Option<String>,
    is_loading: bool,
    error: Option<String>,
    storage: S,
}

impl<S: CredentialStorage> PartialEq for SessionStore<S> {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
            && self.token == other.token
            && self.is_loading == other.is_loading
            && self.error == other.error
    }
}

impl<S: CredentialStorage> SessionStore<S> {
    /// Create an empty store. Starts loading until the first `hydrate`.
    pub fn new(storage: S) -> Self {
        Self {
            user: None,
            token: None,
            is_loading: true,
            error: None,
            storage,
        }
    }

    /// Restore the session from storage. A lone user or lone token is
    /// ignored; both must be present for the store to come up
    /// authenticated. Idempotent.
    pub fn hydrate(&mut self) {
        let stored_user = self
            .storage
            .get(AuthConfig::USER_KEY)
            .and_then(|raw| serde_json::from_str::<User>(&raw).ok());
        let stored_token = self.storage.get(AuthConfig::TOKEN_KEY);

        if let (Some(user), Some(token)) = (stored_user, stored_token) {
            self.user = Some(user);
            self.token = Some(token);
        }
        self.is_loading = false;
    }

    /// Set or clear the account, writing through to storage
    pub fn set_user(&mut self, user: Option<User>) {
        match &user {
            Some(user) => {
                if let Ok(serialized) = serde_json::to_string(user) {
                    self.storage.set(AuthConfig::USER_KEY, &serialized);
                }
            }
            None => self.storage.remove(AuthConfig::USER_KEY),
        }
        self.user = user;
    }

    /// Set or clear the token, writing through to storage
    pub fn set_token(&mut self, token: Option<String>) {
        match &token {
            Some(token) => self.storage.set(AuthConfig::TOKEN_KEY, token),
            None => self.storage.remove(AuthConfig::TOKEN_KEY),
        }
        self.token = token;
    }

    /// Drop the session from memory and storage
    pub fn clear(&mut self) {
        self.set_user(None);
        self.set_token(None);
        self.error = None;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Derived: the session is authenticated iff both user and token are held
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.user.as_ref().is_some_and(|user| user.role == *role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&Role::Admin)
    }

    pub fn is_supervisor(&self) -> bool {
        self.has_role(&Role::Supervisor)
    }

    pub fn is_student(&self) -> bool {
        self.has_role(&Role::Student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Default, Debug)]
    struct MemoryStorage(Rc<RefCell<HashMap<String, String>>>);

    impl CredentialStorage for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.0.borrow_mut().remove(key);
        }
    }

    fn student() -> User {
        User {
            id: "u-1".to_string(),
            email: "sam@campus.edu".to_string(),
            name: "Sam".to_string(),
            role: Role::Student,
            created_at: Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn login_persists_both_keys_and_authenticates() {
        let storage = MemoryStorage::default();
        let mut store = SessionStore::new(storage.clone());

        store.set_user(Some(student()));
        store.set_token(Some("tok".to_string()));

        assert!(store.is_authenticated());
        assert!(storage.get(AuthConfig::USER_KEY).is_some());
        assert_eq!(storage.get(AuthConfig::TOKEN_KEY).as_deref(), Some("tok"));
    }

    #[test]
    fn clear_removes_memory_and_storage() {
        let storage = MemoryStorage::default();
        let mut store = SessionStore::new(storage.clone());
        store.set_user(Some(student()));
        store.set_token(Some("tok".to_string()));

        store.clear();

        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(storage.get(AuthConfig::USER_KEY).is_none());
        assert!(storage.get(AuthConfig::TOKEN_KEY).is_none());
    }

    #[test]
    fn hydrate_restores_a_complete_session() {
        let storage = MemoryStorage::default();
        storage.set(
            AuthConfig::USER_KEY,
            &serde_json::to_string(&student()).unwrap(),
        );
        storage.set(AuthConfig::TOKEN_KEY, "tok");

        let mut store = SessionStore::new(storage);
        assert!(store.is_loading());
        store.hydrate();

        assert!(!store.is_loading());
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("tok"));
        assert_eq!(store.user().unwrap().email, "sam@campus.edu");
    }

    #[test]
    fn hydrate_ignores_a_lone_token() {
        let storage = MemoryStorage::default();
        storage.set(AuthConfig::TOKEN_KEY, "tok");

        let mut store = SessionStore::new(storage);
        store.hydrate();

        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn hydrate_ignores_a_lone_user() {
        let storage = MemoryStorage::default();
        storage.set(
            AuthConfig::USER_KEY,
            &serde_json::to_string(&student()).unwrap(),
        );

        let mut store = SessionStore::new(storage);
        store.hydrate();

        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn hydrate_ignores_unparseable_user_json() {
        let storage = MemoryStorage::default();
        storage.set(AuthConfig::USER_KEY, "{not json");
        storage.set(AuthConfig::TOKEN_KEY, "tok");

        let mut store = SessionStore::new(storage);
        store.hydrate();

        assert!(!store.is_authenticated());
    }

    #[test]
    fn hydrate_is_idempotent() {
        let storage = MemoryStorage::default();
        storage.set(
            AuthConfig::USER_KEY,
            &serde_json::to_string(&student()).unwrap(),
        );
        storage.set(AuthConfig::TOKEN_KEY, "tok");

        let mut store = SessionStore::new(storage);
        store.hydrate();
        let first = store.clone();
        store.hydrate();

        assert_eq!(store, first);
    }

    #[test]
    fn role_predicates_follow_the_held_user() {
        let mut store = SessionStore::new(MemoryStorage::default());
        assert!(!store.is_student());

        store.set_user(Some(student()));
        assert!(store.is_student());
        assert!(!store.is_admin());
        assert!(!store.is_supervisor());
        assert!(store.has_role(&Role::Student));
    }
}
