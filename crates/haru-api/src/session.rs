//! Durable session state: tokens and the cached user profile.
//!
//! The store is an explicitly owned instance (injected into the gateway and
//! the resource clients) rather than ambient global state, so tests can run
//! against an isolated store each.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// The signed-in user, as cached from login/signup/profile responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Client-side authentication state.
///
/// An access token being present is what "signed in" means; there is no
/// separate flag to drift out of sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Durable key/value holder for the session, persisted as a JSON file.
///
/// Every mutation runs as a single atomic unit under one lock, so a
/// concurrent reader never observes a partially cleared session. Disk
/// persistence is best-effort: an IO failure is logged and the in-memory
/// state still updates, because losing durability must never turn into a
/// failed API call.
pub struct SessionStore {
    path: PathBuf,
    inner: Mutex<Session>,
}

impl SessionStore {
    /// Open the store at `path`, loading any previously persisted session.
    pub fn new(path: PathBuf) -> Self {
        let session = Self::load_from(&path);
        Self {
            path,
            inner: Mutex::new(session),
        }
    }

    fn load_from(path: &Path) -> Session {
        if !path.exists() {
            return Session::default();
        }

        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!("Discarding unreadable session file: {}", e);
                    Session::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read session file: {}", e);
                Session::default()
            }
        }
    }

    /// Snapshot of the current session.
    pub fn get(&self) -> Session {
        self.inner.lock().clone()
    }

    /// Whether an access token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().is_authenticated()
    }

    /// Replace the access token.
    pub fn set_token(&self, access_token: impl Into<String>) {
        let mut session = self.inner.lock();
        session.access_token = Some(access_token.into());
        self.persist(&session);
    }

    /// Replace the refresh token.
    pub fn set_refresh_token(&self, refresh_token: impl Into<String>) {
        let mut session = self.inner.lock();
        session.refresh_token = Some(refresh_token.into());
        self.persist(&session);
    }

    /// Replace the cached user profile.
    pub fn set_user(&self, user: UserProfile) {
        let mut session = self.inner.lock();
        session.user = Some(user);
        self.persist(&session);
    }

    /// Drop all session state, memory and disk. Idempotent; a second clear
    /// from a concurrent 401 is a harmless no-op.
    pub fn clear(&self) {
        let mut session = self.inner.lock();
        *session = Session::default();

        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!("Failed to remove session file: {}", e);
            }
        }
        tracing::info!("Session cleared");
    }

    fn persist(&self, session: &Session) {
        let json = match serde_json::to_string_pretty(session) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize session: {}", e);
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!("Failed to create session directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(&self.path, json) {
            tracing::warn!("Failed to write session file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_starts_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.is_authenticated());
        assert_eq!(store.get(), Session::default());
    }

    #[test]
    fn test_token_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set_token("tok1");
        assert!(store.is_authenticated());
        assert_eq!(store.get().access_token.as_deref(), Some("tok1"));

        // Idempotent under repeated identical writes
        store.set_token("tok1");
        assert_eq!(store.get().access_token.as_deref(), Some("tok1"));
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::new(path.clone());
        store.set_token("tok1");
        store.set_refresh_token("refresh1");
        store.set_user(UserProfile {
            id: "1".to_string(),
            email: "a@b.com".to_string(),
            name: None,
        });
        drop(store);

        let reopened = SessionStore::new(path);
        let session = reopened.get();
        assert_eq!(session.access_token.as_deref(), Some("tok1"));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh1"));
        assert_eq!(session.user.map(|u| u.email).as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_clear_is_total_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::new(path.clone());

        store.set_token("tok1");
        store.set_user(UserProfile {
            id: "1".to_string(),
            email: "a@b.com".to_string(),
            name: Some("A".to_string()),
        });

        store.clear();
        assert_eq!(store.get(), Session::default());
        assert!(!path.exists());

        // Second clear leaves the same cleared state
        store.clear();
        assert_eq!(store.get(), Session::default());
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = SessionStore::new(path);
        assert_eq!(store.get(), Session::default());
    }
}
