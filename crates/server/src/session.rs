//! Session storage

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ServerError};

/// Server-side record of one client conversation
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Set by a successful `initialize`; never cleared
    pub initialized: bool,
    /// Whatever the client sent as `params.client` on its last `initialize`
    pub client_info: Option<Value>,
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            initialized: false,
            client_info: None,
        }
    }
}

/// In-memory session store
///
/// Sessions live for the lifetime of the process; there is no removal.
/// Mutations go through [`DashMap::get_mut`], which holds the shard lock for
/// the duration of the read-modify-write.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// Map of session_id to session record
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a session under a client-chosen id.
    ///
    /// Re-registering an existing id resets it to a fresh, uninitialized record.
    pub fn register(&self, id: &str) -> Result<Session> {
        if id.trim().is_empty() {
            return Err(ServerError::invalid_request("Missing sessionId in request body"));
        }

        let session = Session::new(id.to_string());
        if self.sessions.insert(id.to_string(), session.clone()).is_some() {
            debug!(session_id = %id, "Replaced existing session on re-registration");
        }
        Ok(session)
    }

    /// Look up a session
    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|entry| entry.clone())
    }

    /// Number of known sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Mark a session initialized and store the client's metadata
    pub fn initialize(&self, id: &str, client_info: Option<Value>) -> Result<Session> {
        let mut entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))?;
        entry.initialized = true;
        entry.client_info = client_info;
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn register_creates_uninitialized_session() {
        let store = SessionStore::new();
        let session = store.register("abc").unwrap();

        assert_eq!(session.id, "abc");
        assert!(!session.initialized);
        assert!(session.client_info.is_none());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn register_rejects_empty_id() {
        let store = SessionStore::new();
        assert!(matches!(store.register(""), Err(ServerError::InvalidRequest(_))));
        assert!(matches!(store.register("   "), Err(ServerError::InvalidRequest(_))));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn get_is_a_pure_lookup() {
        let store = SessionStore::new();
        assert!(store.get("missing").is_none());
        assert_eq!(store.count(), 0);

        store.register("s1").unwrap();
        assert_eq!(store.get("s1").unwrap().id, "s1");
    }

    #[test]
    fn initialize_sets_flag_and_overwrites_client_info() {
        let store = SessionStore::new();
        store.register("s1").unwrap();

        store.initialize("s1", Some(json!({"name": "first"}))).unwrap();
        let session = store.initialize("s1", Some(json!({"name": "second"}))).unwrap();

        assert!(session.initialized);
        assert_eq!(session.client_info, Some(json!({"name": "second"})));
        assert!(store.get("s1").unwrap().initialized);
    }

    #[test]
    fn initialize_unknown_session_fails() {
        let store = SessionStore::new();
        let err = store.initialize("ghost", None).unwrap_err();
        assert!(matches!(err, ServerError::SessionNotFound(id) if id == "ghost"));
    }

    #[test]
    fn re_registration_resets_state() {
        let store = SessionStore::new();
        store.register("s1").unwrap();
        store.initialize("s1", Some(json!({"name": "c"}))).unwrap();

        let session = store.register("s1").unwrap();
        assert!(!session.initialized);
        assert!(!store.get("s1").unwrap().initialized);
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn concurrent_initialize_keeps_session_initialized() {
        let store = Arc::new(SessionStore::new());
        store.register("shared").unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.initialize("shared", Some(json!({ "n": i }))).unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let session = store.get("shared").unwrap();
        assert!(session.initialized);
        assert!(session.client_info.is_some());
    }
}
