//! Server-side sessions bound to a signed cookie token.
//!
//! The cookie value is `<token>.<hex sha256(secret || token)>`; a forged or
//! tampered token fails signature verification before any store lookup.
//! Sessions expire a fixed interval after issuance and are purged lazily.

use crate::error::AppError;
use crate::models::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sid";

/// User identity attached to the request by the session gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

#[derive(Debug, Clone)]
struct Session {
    user: AuthUser,
    expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    secret: Arc<str>,
    ttl: Duration,
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: Arc::from(secret),
            ttl: Duration::hours(ttl_hours),
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Create a session and return the signed cookie value.
    pub fn issue(&self, user: AuthUser) -> String {
        let token = Uuid::new_v4().to_string();
        let signature = self.sign(&token);
        // Poisoned locks are recovered rather than propagated as a panic.
        let mut sessions = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            token.clone(),
            Session {
                user,
                expires_at: now + self.ttl,
            },
        );
        format!("{}.{}", token, signature)
    }

    /// Resolve a cookie value to its user, rejecting bad signatures and
    /// expired sessions (expired entries are removed on the way out).
    pub fn resolve(&self, cookie_value: &str) -> Option<AuthUser> {
        let token = self.verify(cookie_value)?;
        {
            let sessions = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            let session = sessions.get(&token)?;
            if session.expires_at > Utc::now() {
                return Some(session.user.clone());
            }
        }
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&token);
        None
    }

    /// Server-side invalidation on logout.
    pub fn revoke(&self, cookie_value: &str) -> bool {
        match self.verify(cookie_value) {
            Some(token) => self
                .inner
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&token)
                .is_some(),
            None => false,
        }
    }

    fn sign(&self, token: &str) -> String {
        let digest = Sha256::digest(format!("{}{}", self.secret, token).as_bytes());
        hex_encode(&digest)
    }

    /// Check the signature and return the bare token. Comparison is over
    /// digests so it does not leak a prefix-match timing signal.
    fn verify(&self, cookie_value: &str) -> Option<String> {
        let (token, signature) = cookie_value.split_once('.')?;
        let expected = self.sign(token);
        let a = Sha256::digest(signature.as_bytes());
        let b = Sha256::digest(expected.as_bytes());
        if a == b {
            Some(token.to_string())
        } else {
            None
        }
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Extract this server's session cookie value from the request headers.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Session gate for protected routes: attaches [`CurrentUser`] or rejects
/// with a 401 JSON body before the handler (and store) is reached.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = session_cookie(request.headers()).and_then(|v| state.sessions.resolve(&v));
    match user {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        None => AppError::Unauthorized.into_response(),
    }
}
