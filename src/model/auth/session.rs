use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use data_encoding::BASE64URL_NOPAD;
use rand::Rng;
use rocket::{
    http::{Cookie, SameSite},
    time::Duration as CookieDuration,
    tokio::sync::Mutex,
};

use crate::model::identity::Identity;

pub const SESSION_COOKIE: &str = "session";

/// Number of random bytes in a session token.
const TOKEN_BYTES: usize = 32;

/// Opaque handle to a server-side session, carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn random() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::thread_rng().fill(&mut bytes);
        Self(BASE64URL_NOPAD.encode(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the cookie that carries this token for `ttl`.
    pub fn into_cookie(self, ttl: Duration) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, self.0)
            .path("/")
            .max_age(CookieDuration::seconds(ttl.num_seconds()))
            .http_only(true)
            // Lax rather than Strict: the cookie is set at the end of a redirect chain that
            // starts at the identity provider.
            .same_site(SameSite::Lax)
            .finish()
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// A signed-in identity with an expiry.
#[derive(Debug, Clone)]
struct Session {
    identity: Identity,
    expire_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at <= now
    }
}

/// Server-side session table. Holds identities only, never election state.
///
/// Cloning is cheap and every clone shares the same table.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionToken, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `identity` lasting `ttl`.
    pub async fn create(&self, identity: Identity, ttl: Duration) -> SessionToken {
        let token = SessionToken::random();
        let session = Session {
            identity,
            expire_at: Utc::now() + ttl,
        };
        self.sessions.lock().await.insert(token.clone(), session);
        token
    }

    /// The identity behind `token`, if the session exists and hasn't expired.
    /// Expired sessions are dropped on sight.
    pub async fn identity(&self, token: &SessionToken) -> Option<Identity> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(token) {
            Some(session) if session.is_expired(Utc::now()) => {
                sessions.remove(token);
                None
            }
            Some(session) => Some(session.identity.clone()),
            None => None,
        }
    }

    /// End a session, returning who it belonged to.
    pub async fn destroy(&self, token: &SessionToken) -> Option<Identity> {
        self.sessions
            .lock()
            .await
            .remove(token)
            .map(|session| session.identity)
    }

    /// Remove every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
