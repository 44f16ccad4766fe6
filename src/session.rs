use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::Session;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "attendance_session";

/// How long a session is kept without a sign-out. Matches the default
/// lifetime of a Supabase access token.
pub const DEFAULT_SESSION_TTL_SECS: u32 = 3600;

struct Entry {
    session: Session,
    issued_at: DateTime<Utc>,
}

/// Signed-in sessions keyed by the id stored in the browser cookie.
/// Created on sign-in and dropped on sign-out or once older than the TTL.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(i64::from(DEFAULT_SESSION_TTL_SECS)))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.sessions.write().unwrap_or_else(|poisoned| {
            warn!("session store lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn is_live(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.issued_at < self.ttl
    }

    /// Stores the session under a fresh id. Expired entries are pruned on the
    /// way in.
    pub fn sign_in(&self, session: Session) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut sessions = self.write();

        let before = sessions.len();
        sessions.retain(|_, entry| self.is_live(entry, now));
        if sessions.len() < before {
            debug!("pruned {} expired sessions", before - sessions.len());
        }

        sessions.insert(id.clone(), Entry { session, issued_at: now });
        id
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        let now = Utc::now();
        let live = {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            let entry = sessions.get(id)?;
            self.is_live(entry, now).then(|| entry.session.clone())
        };

        if live.is_none() {
            debug!("session {} expired", id);
            self.write().remove(id);
        }
        live
    }

    pub fn sign_out(&self, id: &str) -> Option<Session> {
        self.write().remove(id).map(|entry| entry.session)
    }
}

pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

pub fn cleared_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// The signed-in user for this request. Requests without a live session are
/// sent to the login page.
pub struct CurrentSession {
    pub id: String,
    pub session: Session,
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(id) = session_id_from_headers(&parts.headers) else {
            debug!("no session cookie on {}", parts.uri.path());
            return Err(Redirect::to("/login").into_response());
        };

        match state.sessions.get(&id) {
            Some(session) => Ok(CurrentSession { id, session }),
            None => {
                debug!("unknown session id on {}", parts.uri.path());
                Err(Redirect::to("/login").into_response())
            }
        }
    }
}
