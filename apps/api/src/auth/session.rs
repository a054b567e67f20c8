use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Opaque handle carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionToken)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl
    }
}

/// Signed-in sessions. Cheap to clone; clones share the same map.
///
/// A session lives for `ttl` after it begins. Expired entries are dropped on
/// lookup and swept whenever a new session begins.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub async fn begin(&self, email: &str) -> SessionToken {
        let token = SessionToken(Uuid::new_v4());
        let now = Utc::now();
        let session = Session {
            email: email.to_string(),
            created_at: now,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        sessions.insert(token, session);
        token
    }

    pub async fn get(&self, token: &SessionToken) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired(self.ttl, now) => {
                    return Some(session.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }

        debug!("Dropping expired session");
        self.sessions.write().await.remove(token);
        None
    }

    /// Idempotent; unknown tokens are ignored.
    pub async fn end(&self, token: &SessionToken) {
        self.sessions.write().await.remove(token);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
