use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
struct Session {
    user_id: i64,
    last_seen_at: DateTime<Utc>,
}

/// In-memory login sessions keyed by bearer token. A session expires once it
/// has been idle for longer than `idle_timeout`.
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub async fn create_session(&self, user_id: i64) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let session = Session {
            user_id,
            last_seen_at: Utc::now(),
        };

        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, s| !self.is_expired(s));
        sessions.insert(token.clone(), session);
        token
    }

    /// Resolves the token to its user and refreshes the idle clock
    pub async fn get_user_id(&self, token: &str) -> Option<i64> {
        let mut sessions = self.sessions.lock().await;

        let expired = match sessions.get_mut(token) {
            Some(session) if !self.is_expired(session) => {
                session.last_seen_at = Utc::now();
                return Some(session.user_id);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            sessions.remove(token);
        }
        None
    }

    pub async fn end_session(&self, token: &str) -> bool {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(token).is_some()
    }

    fn is_expired(&self, session: &Session) -> bool {
        Utc::now() - session.last_seen_at > self.idle_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new(Duration::hours(2));
        let token = store.create_session(42).await;

        assert_eq!(store.get_user_id(&token).await, Some(42));
        assert_eq!(store.get_user_id("unknown").await, None);

        assert!(store.end_session(&token).await);
        assert_eq!(store.get_user_id(&token).await, None);
        assert!(!store.end_session(&token).await);
    }

    #[tokio::test]
    async fn test_idle_session_expires() {
        let store = SessionStore::new(Duration::zero());
        let token = store.create_session(7).await;

        {
            let mut sessions = store.sessions.lock().await;
            sessions.get_mut(&token).unwrap().last_seen_at = Utc::now() - Duration::seconds(1);
        }

        assert_eq!(store.get_user_id(&token).await, None);
        assert!(!store.end_session(&token).await);
    }
}
