//! In-memory bearer-token sessions.
//!
//! Single-node storage only, which matches the deployment shape of an
//! internal dashboard. Sessions do not survive a restart; users log in again.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use uuid::Uuid;

use crate::models::Role;

/// One live login session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Concurrent session map keyed by token.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Create a session for a user and return it. The token is 32 random
    /// bytes, hex-encoded.
    pub fn create(&self, user_id: Uuid, role: Role) -> Session {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        let token = hex::encode(bytes);

        let now = Utc::now();
        let session = Session {
            token: token.clone(),
            user_id,
            role,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.insert(token, session.clone());
        session
    }

    /// Look up a session by token. Expired sessions are removed on access.
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?.clone();
        if session.is_expired() {
            self.sessions.remove(token);
            return None;
        }
        Some(session)
    }

    /// Revoke a session. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Revoke every session belonging to a user (on deletion or role change).
    pub fn revoke_for_user(&self, user_id: Uuid) -> usize {
        let tokens: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.token.clone())
            .collect();
        for token in &tokens {
            self.sessions.remove(token);
        }
        tokens.len()
    }
}
