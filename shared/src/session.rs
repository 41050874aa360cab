//! Persistent session (bearer token + user profile).
//!
//! The store is generic over a [`KeyValueStorage`] so the browser
//! (`localStorage`), the CLI (a JSON file) and tests (memory) share one
//! implementation of the token/user invariants.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Role, SessionUser};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "adminToken";
/// Storage key holding the JSON-encoded [`SessionUser`].
pub const USER_KEY: &str = "adminUser";

/// Failure while writing session entries.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be reached (no window, private mode, ...).
    #[error("session storage is unavailable")]
    Unavailable,
    /// A single write was refused.
    #[error("failed to write `{key}`: {reason}")]
    Write {
        /// Key being written.
        key: String,
        /// Backend-specific reason.
        reason: String,
    },
    /// The user profile could not be encoded.
    #[error("failed to encode session user: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal string key/value persistence.
pub trait KeyValueStorage {
    /// Read one entry. Unreadable entries are reported as absent.
    fn get(&self, key: &str) -> Option<String>;
    /// Write one entry.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove one entry; removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Authenticated session as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer credential.
    pub token: String,
    /// Profile returned alongside the token.
    pub user: SessionUser,
}

impl Session {
    /// Whether the session belongs to an admin.
    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

/// Token + profile persisted together.
#[derive(Debug, Clone, Default)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// Wrap a storage backend.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
        }
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current session. Fails closed: a missing half or an undecodable
    /// profile is treated as no session.
    pub fn get(&self) -> Option<Session> {
        let token = self
            .storage
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())?;
        let raw_user = self.storage.get(USER_KEY)?;
        match serde_json::from_str::<SessionUser>(&raw_user) {
            Ok(user) => Some(Session {
                token,
                user,
            }),
            Err(err) => {
                tracing::warn!("discarding malformed session user: {err}");
                None
            },
        }
    }

    /// Bearer token of the current session.
    pub fn token(&self) -> Option<String> {
        self.get().map(|session| session.token)
    }

    /// Persist a new session. When the second write fails the first one is
    /// rolled back, so readers never observe half a session.
    pub fn set(&self, token: &str, user: &SessionUser) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &encoded)?;
        if let Err(err) = self.storage.set(TOKEN_KEY, token) {
            self.storage.remove(USER_KEY);
            return Err(err);
        }
        Ok(())
    }

    /// Remove token and profile.
    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }

    /// Whether a complete session is stored.
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Whether the stored session belongs to an admin.
    pub fn is_admin(&self) -> bool {
        self.get().is_some_and(|session| session.is_admin())
    }

    /// Where the current session should land.
    pub fn landing(&self) -> Landing {
        landing(self.get().as_ref())
    }
}

/// Entry point a visitor is routed to based on their session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// No session: the admin login form.
    Login,
    /// Admin session: the dashboard.
    Dashboard,
    /// Non-admin session: the welcome page.
    Welcome,
}

impl Landing {
    /// Frontend path of the landing page.
    pub fn path(&self) -> &'static str {
        match self {
            Landing::Login => "/admin/dashboard",
            Landing::Dashboard => "/admin",
            Landing::Welcome => "/welcome",
        }
    }

    /// Where the logout button on this landing page leads. The dashboard
    /// goes to the welcome page, whose guard then bounces to login.
    pub fn after_logout(&self) -> Landing {
        match self {
            Landing::Dashboard => Landing::Welcome,
            Landing::Login | Landing::Welcome => Landing::Login,
        }
    }
}

/// Route a (possibly absent) session.
pub fn landing(session: Option<&Session>) -> Landing {
    match session {
        None => Landing::Login,
        Some(session) if session.is_admin() => Landing::Dashboard,
        Some(_) => Landing::Welcome,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn admin() -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            email: "admin@visvas.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn set_then_get_round_trips_both_halves() {
        let store = SessionStore::new(MemoryStorage::new());
        store.set("tok", &admin()).expect("set session");

        let session = store.get().expect("session present");
        assert_eq!(session.token, "tok");
        assert_eq!(session.user, admin());
        assert!(store.is_admin());
        assert_eq!(store.landing(), Landing::Dashboard);
    }

    #[test]
    fn clear_removes_token_and_user() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        store.set("tok", &admin()).expect("set session");
        store.clear();

        assert!(storage.is_empty());
        assert!(!store.is_authenticated());
        assert_eq!(store.landing(), Landing::Login);
    }

    #[test]
    fn malformed_user_fails_closed() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").expect("write token");
        storage.set(USER_KEY, "{not json").expect("write user");

        let store = SessionStore::new(storage);
        assert_eq!(store.get(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn token_without_user_is_no_session() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").expect("write token");
        assert!(!SessionStore::new(storage).is_authenticated());
    }

    #[test]
    fn logout_targets_follow_the_page_left() {
        assert_eq!(Landing::Dashboard.after_logout(), Landing::Welcome);
        assert_eq!(Landing::Dashboard.after_logout().path(), "/welcome");
        assert_eq!(Landing::Welcome.after_logout(), Landing::Login);
        assert_eq!(Landing::Welcome.after_logout().path(), "/admin/dashboard");
    }

    #[test]
    fn plain_user_lands_on_welcome() {
        let store = SessionStore::new(MemoryStorage::new());
        let user = SessionUser {
            role: Role::User,
            ..admin()
        };
        store.set("tok", &user).expect("set session");
        assert!(!store.is_admin());
        assert_eq!(store.landing(), Landing::Welcome);
    }

    /// Accepts the first write and refuses every later one.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        writes: Cell<usize>,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let writes = self.writes.get() + 1;
            self.writes.set(writes);
            if writes > 1 {
                return Err(StorageError::Write {
                    key: key.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) {
            self.inner.remove(key);
        }
    }

    #[test]
    fn failed_second_write_leaves_no_partial_session() {
        let store = SessionStore::new(FlakyStorage::default());
        assert!(store.set("tok", &admin()).is_err());
        assert!(store.storage().inner.is_empty());
        assert_eq!(store.get(), None);
    }
}
