//! Session storage with an explicit lifecycle
//!
//! The backend authenticates with a cookie session. Rather than an ambient
//! process-global "current user", the session is an explicit object loaded
//! from and saved to an injected [`SessionStore`]; clients receive the store
//! at construction time and never read shared mutable state. Expiry is
//! handled on load: an expired session is cleared and reported as absent.

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqnest_domain::ReqNestError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A cached backend session: the cookie to replay and when it stops working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Value for the `Cookie` request header.
    pub cookie: String,
    /// When the session expires, if known. `None` means trust until the
    /// backend rejects it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session with no known expiry.
    pub fn new(cookie: impl Into<String>) -> Self {
        Self { cookie: cookie.into(), expires_at: None }
    }

    /// Create a session that expires at a known instant.
    pub fn with_expiry(cookie: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self { cookie: cookie.into(), expires_at: Some(expires_at) }
    }

    /// Whether the session is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

/// Trait for loading and persisting the backend session.
///
/// This trait allows dependency injection and testing with mock stores.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the stored session, if any.
    async fn load(&self) -> Result<Option<Session>, ReqNestError>;

    /// Persist `session`, replacing any stored one.
    async fn save(&self, session: &Session) -> Result<(), ReqNestError>;

    /// Forget the stored session.
    async fn clear(&self) -> Result<(), ReqNestError>;
}

/// Load the stored session and apply the expiry lifecycle.
///
/// An expired session is cleared from the store and reported as absent, so
/// a stale cookie is never replayed.
pub async fn active_session(
    store: &dyn SessionStore,
) -> Result<Option<Session>, ReqNestError> {
    match store.load().await? {
        Some(session) if session.is_expired(Utc::now()) => {
            debug!("stored session expired, clearing");
            store.clear().await?;
            Ok(None)
        }
        other => Ok(other),
    }
}

/// In-memory session store, the default for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with `session`.
    pub fn with_session(session: Session) -> Self {
        Self { inner: RwLock::new(Some(session)) }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, ReqNestError> {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| ReqNestError::Internal("session store lock poisoned".to_string()))
    }

    async fn save(&self, session: &Session) -> Result<(), ReqNestError> {
        self.inner
            .write()
            .map(|mut guard| *guard = Some(session.clone()))
            .map_err(|_| ReqNestError::Internal("session store lock poisoned".to_string()))
    }

    async fn clear(&self) -> Result<(), ReqNestError> {
        self.inner
            .write()
            .map(|mut guard| *guard = None)
            .map_err(|_| ReqNestError::Internal("session store lock poisoned".to_string()))
    }
}

/// JSON-file-backed session store for CLI usage across invocations.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, ReqNestError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ReqNestError::Internal(format!(
                    "failed to read session file: {err}"
                )))
            }
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // A corrupt cache means logged-out, not broken.
                warn!(path = %self.path.display(), error = %err, "session file unreadable, ignoring");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), ReqNestError> {
        let contents = serde_json::to_string_pretty(session).map_err(|err| {
            ReqNestError::Internal(format!("failed to serialize session: {err}"))
        })?;

        std::fs::write(&self.path, contents).map_err(|err| {
            ReqNestError::Internal(format!("failed to write session file: {err}"))
        })
    }

    async fn clear(&self) -> Result<(), ReqNestError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(ReqNestError::Internal(format!("failed to remove session file: {err}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn session_without_expiry_never_expires() {
        let session = Session::new("sid=abc");
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn session_with_past_expiry_is_expired() {
        let session = Session::with_expiry("sid=abc", Utc::now() - Duration::minutes(1));
        assert!(session.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.load().await.unwrap().is_none());

        let session = Session::new("sid=abc");
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn active_session_clears_expired_entries() {
        let expired = Session::with_expiry("sid=abc", Utc::now() - Duration::hours(1));
        let store = MemorySessionStore::with_session(expired);

        assert!(active_session(&store).await.unwrap().is_none());
        // The expired entry is gone, not just filtered.
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().await.unwrap().is_none());

        let session = Session::new("sid=abc");
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // Clearing twice is fine.
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn file_store_ignores_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(path);
        assert!(store.load().await.unwrap().is_none());
    }
}
