use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use chrono::Utc;
use tokio::sync::Mutex;
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

use crate::{types::Token, utils};

pub const SESSION_COOKIE_NAME: &str = "sporldupes_session";

/// Sessions untouched for this long are dropped when a new one is created.
pub const SESSION_IDLE_SECS: i64 = 24 * 60 * 60;

/// Idle limit for sessions that never completed a login. Long enough for
/// the consent page round trip.
pub const ANONYMOUS_SESSION_IDLE_SECS: i64 = 15 * 60;

/// Server-side data of one browser session.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub token: Option<Token>,
    pub oauth_state: Option<String>,
    pub last_seen: i64,
}

impl SessionData {
    fn idle_limit(&self) -> i64 {
        if self.token.is_some() {
            SESSION_IDLE_SECS
        } else {
            ANONYMOUS_SESSION_IDLE_SECS
        }
    }
}

/// In-memory store of browser sessions keyed by session id.
///
/// The browser only ever sees the opaque id; tokens stay on the server.
/// The lock is held for map access only and never across a remote call.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session and returns its id.
    ///
    /// Idle sessions are pruned first, which is how sessions whose browser
    /// went away eventually disappear. Sessions without a token expire
    /// after [`ANONYMOUS_SESSION_IDLE_SECS`], so requests that never log in
    /// do not pile up.
    pub async fn create(&self) -> String {
        let now = Utc::now().timestamp();
        let id = utils::generate_session_id();

        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, data| now - data.last_seen < data.idle_limit());
        sessions.insert(
            id.clone(),
            SessionData {
                last_seen: now,
                ..SessionData::default()
            },
        );
        id
    }

    /// Marks a session as used. Returns `false` if the id is unknown.
    pub async fn touch(&self, id: &str) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(id) {
            Some(data) => {
                data.last_seen = Utc::now().timestamp();
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, id: &str) -> Option<SessionData> {
        self.sessions.lock().await.get(id).cloned()
    }

    /// Applies `f` to the data of a session, if it exists.
    pub async fn update<F, R>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut SessionData) -> R,
    {
        self.sessions.lock().await.get_mut(id).map(f)
    }

    pub async fn remove(&self, id: &str) -> Option<SessionData> {
        self.sessions.lock().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// The caller's browser session, resolved from the session cookie.
///
/// Extracting a `Session` never fails for a request that went through the
/// cookie middleware: an absent or unknown cookie yields a fresh session and
/// the new cookie is sent with the response.
#[derive(Clone)]
pub struct Session {
    id: String,
    store: SessionStore,
    cookies: Cookies,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn token(&self) -> Option<Token> {
        self.store.get(&self.id).await.and_then(|data| data.token)
    }

    pub async fn set_token(&self, token: Token) {
        self.store
            .update(&self.id, |data| data.token = Some(token))
            .await;
    }

    /// Discards the stored token.
    pub async fn clear_token(&self) {
        self.store.update(&self.id, |data| data.token = None).await;
    }

    /// Stores a new OAuth `state` value and returns it.
    pub async fn issue_state(&self) -> String {
        let state = utils::generate_state();
        let stored = state.clone();
        self.store
            .update(&self.id, |data| data.oauth_state = Some(stored))
            .await;
        state
    }

    /// Removes and returns the pending OAuth `state`. Each value is usable once.
    pub async fn take_state(&self) -> Option<String> {
        self.store
            .update(&self.id, |data| data.oauth_state.take())
            .await
            .flatten()
    }

    /// Destroys the session on the server and expires the browser cookie.
    pub async fn destroy(&self) {
        self.store.remove(&self.id).await;
        self.cookies.remove(session_cookie(String::new()));
    }
}

fn session_cookie(id: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, id);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

impl<S> FromRequestParts<S> for Session
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing cookie middleware",
        ))?;
        let store = SessionStore::from_ref(state);

        let existing = cookies
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string());

        let known = match &existing {
            Some(id) => store.touch(id).await,
            None => false,
        };

        let id = match existing {
            Some(id) if known => id,
            _ => {
                let id = store.create().await;
                cookies.add(session_cookie(id.clone()));
                id
            }
        };

        Ok(Session { id, store, cookies })
    }
}
