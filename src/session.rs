//! Client-side session: the signed-in user's profile and bearer token.
//!
//! The session is persisted by the web client in a key/value store under
//! `userInfo`. It is read once when the feed mounts and never re-synced.

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<Profile>,
    pub access_token: Option<String>,
}

impl Session {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            user: None,
            access_token: Some(token.into()),
        }
    }

    /// The bearer token, if it is present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn display_name(&self) -> Option<&str> {
        let user = self.user.as_ref()?;
        user.username.as_deref().or(user.full_name.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct StoredSession {
    #[serde(default)]
    user: Option<Profile>,
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

/// Decodes the persisted `{ user, accessToken }` blob.
///
/// Malformed input yields an empty session. A token without a `user` object
/// is ignored, matching how the web client adopts a stored session.
pub fn parse_session(raw: &str) -> Session {
    let stored: StoredSession = match serde_json::from_str(raw) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed stored session");
            return Session::default();
        }
    };

    match stored.user {
        Some(user) => Session {
            user: Some(user),
            access_token: stored.access_token,
        },
        None => Session::default(),
    }
}

pub trait SessionProvider: Send + Sync {
    fn read_session(&self) -> Session;
}

/// A fixed session, used for `--token` and in tests.
pub struct StaticSessionProvider {
    session: Session,
}

impl StaticSessionProvider {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl SessionProvider for StaticSessionProvider {
    fn read_session(&self) -> Session {
        self.session.clone()
    }
}

/// A JSON object file standing in for browser local storage.
///
/// Values are normally JSON-encoded strings, as local storage holds them;
/// inline objects are accepted too so the file can be written by hand.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "local store unreadable");
                return None;
            }
        };

        let mut root: Value = match serde_json::from_str(&content) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "local store is not JSON");
                return None;
            }
        };

        match root.get_mut(key)?.take() {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

pub struct LocalStoreSessionProvider {
    store: LocalStore,
    key: String,
}

impl LocalStoreSessionProvider {
    pub fn new(store: LocalStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl SessionProvider for LocalStoreSessionProvider {
    fn read_session(&self) -> Session {
        match self.store.get_item(&self.key) {
            Some(raw) => parse_session(&raw),
            None => Session::default(),
        }
    }
}
