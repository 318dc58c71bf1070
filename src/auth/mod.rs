//! Session management
//!
//! Token issuance and validation are opaque by design: a login produces a
//! random token held server-side with an expiry, delivered to the SPA in an
//! HttpOnly cookie. The cookie outlives the token so an expired session
//! yields a clean 401 instead of a missing-cookie edge case.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Server-side lifetime of a session token.
pub const TOKEN_TTL_HOURS: i64 = 1;
/// Browser-side lifetime of the session cookie.
pub const COOKIE_TTL_HOURS: i64 = 5;

#[derive(Debug, Clone)]
struct Session {
    user_id: u32,
    expires_at: DateTime<Utc>,
}

/// In-process session table. Sessions are request-scoped reads under an
/// `RwLock`; nothing is persisted, a restart logs everyone out.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for `user_id`, valid for [`TOKEN_TTL_HOURS`].
    pub fn issue(&self, user_id: u32) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id,
            expires_at: Utc::now() + Duration::hours(TOKEN_TTL_HOURS),
        };
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its user id. Expired sessions are dropped on the
    /// way out and resolve to `None`.
    pub fn resolve(&self, token: &str) -> Option<u32> {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Some(session.user_id),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Drop a session, if present. Logging out an unknown token is a no-op.
    pub fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.remove(token);
    }

    pub fn active_count(&self) -> usize {
        let sessions = self.sessions.read().expect("session lock poisoned");
        sessions.len()
    }
}
