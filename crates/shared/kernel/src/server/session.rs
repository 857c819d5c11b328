//! Server-side browser sessions.
//!
//! The browser only ever sees an opaque id in an `HttpOnly` cookie; the
//! provider session (access token included) stays in a TTL cache.

use crate::safe_nanoid;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use handy_domain::account::Session;
use handy_domain::config::SessionConfig;
use moka::sync::Cache;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const SESSION_ID_LEN: usize = 32;

#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, Session>,
    cookie_name: Arc<str>,
    secure: bool,
    ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("cookie_name", &self.cookie_name)
            .field("secure", &self.secure)
            .field("ttl", &self.ttl)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let ttl = Duration::from_secs(config.ttl_seconds.max(1));
        Self {
            cache: Cache::builder().max_capacity(config.cache_capacity).time_to_idle(ttl).build(),
            cookie_name: Arc::from(config.cookie_name.as_str()),
            secure: config.secure_cookie,
            ttl,
        }
    }

    /// Stores `session` and returns the id to hand to the browser.
    #[must_use]
    pub fn insert(&self, session: Session) -> String {
        let id = safe_nanoid!(SESSION_ID_LEN);
        debug!(account = %session.account_id, "Session opened");
        self.cache.insert(id.clone(), session);
        id
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        self.cache.get(id)
    }

    pub fn remove(&self, id: &str) {
        self.cache.invalidate(id);
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Reads this store's session id from a `Cookie` request header.
    #[must_use]
    pub fn session_id(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == &*self.cookie_name)
            .map(|(_, value)| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    /// `Set-Cookie` value carrying `id`.
    #[must_use]
    pub fn cookie(&self, id: &str) -> HeaderValue {
        self.header(id, self.ttl.as_secs())
    }

    /// `Set-Cookie` value that makes the browser forget the session.
    #[must_use]
    pub fn expired_cookie(&self) -> HeaderValue {
        self.header("", 0)
    }

    fn header(&self, value: &str, max_age: u64) -> HeaderValue {
        let secure = if self.secure { " Secure;" } else { "" };
        let cookie = format!(
            "{}={value}; Path=/; HttpOnly;{secure} SameSite=Lax; Max-Age={max_age}",
            self.cookie_name
        );
        // Names come from config and ids from the safe alphabet; fall back to
        // an empty cookie rather than fail the response.
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    /// Headers that set the cookie for `id`.
    #[must_use]
    pub fn set_cookie_headers(&self, id: &str) -> [(axum::http::HeaderName, HeaderValue); 1] {
        [(SET_COOKIE, self.cookie(id))]
    }

    /// Headers that clear the cookie.
    #[must_use]
    pub fn clear_cookie_headers(&self) -> [(axum::http::HeaderName, HeaderValue); 1] {
        [(SET_COOKIE, self.expired_cookie())]
    }
}

/// The caller's session, if the cookie names a live one.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession {
    /// Cookie value as sent, even when it no longer maps to a session.
    pub id: Option<String>,
    pub session: Option<Session>,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = SessionStore::from_ref(state);
        let id = store.session_id(&parts.headers);
        let session = id.as_deref().and_then(|id| store.get(id));
        Ok(Self { id, session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handy_domain::account::AccountId;

    fn store(secure: bool) -> SessionStore {
        SessionStore::new(&SessionConfig { secure_cookie: secure, ..SessionConfig::default() })
    }

    fn session() -> Session {
        Session {
            account_id: AccountId::new("acc-1").unwrap(),
            access_token: "token".to_owned(),
        }
    }

    #[test]
    fn insert_get_remove() {
        let store = store(false);
        let id = store.insert(session());
        assert_eq!(id.len(), SESSION_ID_LEN);
        assert_eq!(store.get(&id).unwrap().access_token, "token");

        store.remove(&id);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn cookie_attributes() {
        let cookie = store(false).cookie("abc");
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("handy_session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));

        assert!(store(true).cookie("abc").to_str().unwrap().contains("Secure;"));
        assert!(store(false).expired_cookie().to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn session_id_is_found_among_other_cookies() {
        let store = store(false);
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; handy_session=XyZ23; lang=en"));
        assert_eq!(store.session_id(&headers).as_deref(), Some("XyZ23"));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("handy_session_old=1; handy_session="));
        assert!(store.session_id(&headers).is_none());
    }
}
