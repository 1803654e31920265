use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

struct SessionEntry {
    username: String,
    expires_at: DateTime<Utc>,
}

/// Process-local session store.
///
/// Tokens are opaque UUIDs, distinct from the username they map to.
/// Nothing here survives a restart: sessions are ephemeral by contract and
/// every user simply logs in again. Held in `web::Data` and shared across
/// workers, never a process global.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issues a fresh token bound to one username
    pub fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();

        if let Ok(mut sessions) = self.sessions.write() {
            // Expired entries are swept on every login
            let now = Utc::now();
            sessions.retain(|_, entry| entry.expires_at > now);

            sessions.insert(
                token.clone(),
                SessionEntry {
                    username: username.to_string(),
                    expires_at: Utc::now() + self.ttl,
                },
            );
        }

        token
    }

    /// Resolves a token to its username, expiring stale entries
    pub fn validate(&self, token: &str) -> Option<String> {
        let expired = {
            let sessions = self.sessions.read().ok()?;
            match sessions.get(token) {
                Some(entry) if entry.expires_at > Utc::now() => {
                    return Some(entry.username.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            if let Ok(mut sessions) = self.sessions.write() {
                sessions.remove(token);
            }
        }

        None
    }

    /// Logout. Unknown tokens are a no-op, so logout is idempotent.
    pub fn destroy(&self, token: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(token);
        }
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_token_validates_to_its_username() {
        let store = SessionStore::new(Duration::hours(1));

        let token = store.create("farmer1");

        assert_eq!(store.validate(&token), Some("farmer1".to_string()));
    }

    #[test]
    fn tokens_are_opaque_and_unique() {
        let store = SessionStore::new(Duration::hours(1));

        let first = store.create("farmer1");
        let second = store.create("farmer1");

        assert_ne!(first, second);
        assert!(!first.contains("farmer1"));
    }

    #[test]
    fn destroyed_session_no_longer_validates() {
        let store = SessionStore::new(Duration::hours(1));

        let token = store.create("farmer1");
        store.destroy(&token);

        assert_eq!(store.validate(&token), None);
        // Idempotent
        store.destroy(&token);
    }

    #[test]
    fn unknown_token_is_rejected() {
        let store = SessionStore::new(Duration::hours(1));

        assert_eq!(store.validate("not-a-token"), None);
    }

    #[test]
    fn expired_session_is_rejected_and_removed() {
        let store = SessionStore::new(Duration::zero());

        let token = store.create("farmer1");

        assert_eq!(store.validate(&token), None);
        assert_eq!(store.active_count(), 0);
    }
}
