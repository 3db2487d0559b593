//! HTTP session management for MCP transport
//!
//! Sessions are identified by a UUID handed out on `initialize`, expire after
//! 30 minutes of inactivity, and are capped at a configurable count.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Idle time after which a session expires
pub const SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Default cap on concurrent sessions
pub const DEFAULT_MAX_SESSIONS: usize = 50;

type SessionMap = HashMap<Uuid, StreamableHttpSession>;

/// Session metadata for HTTP transport
#[derive(Debug, Clone)]
pub struct StreamableHttpSession {
    /// Unique session identifier (UUID v4)
    pub session_id: Uuid,

    /// Client metadata (User-Agent)
    pub client_metadata: HashMap<String, String>,

    /// Session creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp (updated on each request)
    pub last_activity: DateTime<Utc>,

    /// Session expiration timestamp (created_at + 30 minutes)
    pub expires_at: DateTime<Utc>,
}

impl StreamableHttpSession {
    /// Create a new session
    pub fn new(client_metadata: HashMap<String, String>) -> Self {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(SESSION_TIMEOUT_MINUTES);

        Self {
            session_id: Uuid::new_v4(),
            client_metadata,
            created_at: now,
            last_activity: now,
            expires_at,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Update last activity timestamp and extend expiration
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.last_activity = now;
        self.expires_at = now + Duration::minutes(SESSION_TIMEOUT_MINUTES);
    }
}

/// Thread-safe session store
#[derive(Clone)]
pub struct SessionStore {
    /// Active sessions keyed by session ID
    sessions: Arc<RwLock<SessionMap>>,

    /// Maximum concurrent sessions
    max_sessions: usize,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionMap> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionMap> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a new session and store it
    ///
    /// Expired sessions are swept first so they never count against the limit.
    ///
    /// # Errors
    /// - `SessionLimitExceeded` if max_sessions reached
    pub fn create_session(
        &self,
        client_metadata: HashMap<String, String>,
    ) -> Result<Uuid, SessionError> {
        let mut sessions = self.write();
        let now = Utc::now();
        sessions.retain(|_, session| session.expires_at >= now);

        if sessions.len() >= self.max_sessions {
            return Err(SessionError::SessionLimitExceeded(self.max_sessions));
        }

        let session = StreamableHttpSession::new(client_metadata);
        let session_id = session.session_id;

        sessions.insert(session_id, session);

        Ok(session_id)
    }

    /// Validate session and update activity timestamp
    ///
    /// # Errors
    /// - `SessionNotFound` if session ID doesn't exist
    /// - `SessionExpired` if session was idle past the timeout
    pub fn validate_session(&self, session_id: Uuid) -> Result<(), SessionError> {
        let mut sessions = self.write();

        match sessions.get_mut(&session_id) {
            Some(session) => {
                if session.is_expired() {
                    sessions.remove(&session_id);
                    Err(SessionError::SessionExpired(session_id))
                } else {
                    session.touch();
                    Ok(())
                }
            }
            None => Err(SessionError::SessionNotFound(session_id)),
        }
    }

    #[cfg(test)]
    fn get_session(&self, session_id: Uuid) -> Option<StreamableHttpSession> {
        self.read().get(&session_id).cloned()
    }

    /// Remove a session (client-initiated close)
    pub fn remove_session(&self, session_id: Uuid) -> bool {
        self.write().remove(&session_id).is_some()
    }

    /// Remove expired sessions
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, session| session.expires_at >= now);
        before - sessions.len()
    }

    /// Get current session count
    pub fn session_count(&self) -> usize {
        self.read().len()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    #[cfg(test)]
    fn expire(&self, session_id: Uuid) {
        if let Some(session) = self.write().get_mut(&session_id) {
            session.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

/// Session-related errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Session expired: {0}")]
    SessionExpired(Uuid),

    #[error("Session limit exceeded: maximum {0} concurrent sessions")]
    SessionLimitExceeded(usize),

    #[error("Invalid session ID format")]
    InvalidSessionId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session() {
        let store = SessionStore::new(50);
        let metadata = HashMap::new();

        let session_id = store.create_session(metadata).unwrap();
        assert_eq!(store.session_count(), 1);

        let session = store.get_session(session_id).unwrap();
        assert_eq!(session.session_id, session_id);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_limit() {
        let store = SessionStore::new(2);

        let _ = store.create_session(HashMap::new()).unwrap();
        let _ = store.create_session(HashMap::new()).unwrap();

        // Third session should fail
        let result = store.create_session(HashMap::new());
        assert!(matches!(result, Err(SessionError::SessionLimitExceeded(2))));
    }

    #[test]
    fn test_validate_session() {
        let store = SessionStore::new(50);
        let session_id = store.create_session(HashMap::new()).unwrap();

        // Should validate successfully
        assert!(store.validate_session(session_id).is_ok());

        // Invalid session should fail
        let fake_id = Uuid::new_v4();
        assert!(matches!(
            store.validate_session(fake_id),
            Err(SessionError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_session_touch() {
        let store = SessionStore::new(50);
        let session_id = store.create_session(HashMap::new()).unwrap();

        let original_expiry = store.get_session(session_id).unwrap().expires_at;

        // Validate (which calls touch)
        std::thread::sleep(std::time::Duration::from_millis(10));
        store.validate_session(session_id).unwrap();

        let new_expiry = store.get_session(session_id).unwrap().expires_at;
        assert!(new_expiry > original_expiry);
    }

    #[test]
    fn test_expired_session_rejected_and_removed() {
        let store = SessionStore::new(50);
        let session_id = store.create_session(HashMap::new()).unwrap();
        store.expire(session_id);

        assert!(matches!(
            store.validate_session(session_id),
            Err(SessionError::SessionExpired(_))
        ));
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_expired_sessions_free_capacity() {
        let store = SessionStore::new(1);
        let first = store.create_session(HashMap::new()).unwrap();
        store.expire(first);

        assert!(store.create_session(HashMap::new()).is_ok());
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn test_cleanup_and_remove() {
        let store = SessionStore::new(50);
        let stale = store.create_session(HashMap::new()).unwrap();
        let live = store.create_session(HashMap::new()).unwrap();
        store.expire(stale);

        assert_eq!(store.cleanup_expired_sessions(), 1);
        assert!(store.remove_session(live));
        assert!(!store.remove_session(live));
        assert_eq!(store.session_count(), 0);
    }
}
