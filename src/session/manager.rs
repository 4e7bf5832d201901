//! Session Manager
//!
//! Reads and writes the opaque session token. Token issuance and validation
//! belong to the backend; this side only stores what it was given.

use super::cookie::{read_cookie, SessionCookie};
use super::store::{CookieStore, StoreError};
use crate::api::{DashboardApi, User, SESSION_COOKIE};

/// Result of probing an existing session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionProbe {
    /// Cookie present and confirmed by the backend
    Active(User),
    /// No cookie, rejected cookie, or backend unreachable
    NoSession,
}

/// Session cookie owner
#[derive(Debug)]
pub struct SessionManager<S> {
    store: S,
    cookie_name: String,
    secure: bool,
}

impl<S: CookieStore> SessionManager<S> {
    /// `secure` adds the `Secure` attribute (page served over https)
    pub fn new(store: S, secure: bool) -> Self {
        Self {
            store,
            cookie_name: SESSION_COOKIE.to_string(),
            secure,
        }
    }

    pub fn with_cookie_name(mut self, name: &str) -> Self {
        self.cookie_name = name.to_string();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current session token, if any
    pub fn get_session(&self) -> Option<String> {
        read_cookie(&self.store.cookie_string(), &self.cookie_name)
    }

    /// Persist a token; "remember me" keeps it for 30 days
    pub fn set_session(&mut self, token: &str, remember_me: bool) -> Result<(), StoreError> {
        let cookie = SessionCookie::issue(&self.cookie_name, token, remember_me, self.secure);
        tracing::debug!(remember_me, "Storing session cookie");
        self.store.write(&cookie)
    }

    /// Expire the session cookie immediately
    pub fn clear_session(&mut self) -> Result<(), StoreError> {
        self.store.write(&SessionCookie::expire(&self.cookie_name))
    }

    /// Check whether an existing cookie still names a valid session.
    ///
    /// Any failure while probing counts as "no session". `api` must send the
    /// stored token with its requests.
    pub async fn check_existing<A>(&self, api: &A) -> SessionProbe
    where
        A: DashboardApi + ?Sized,
    {
        if self.get_session().is_none() {
            return SessionProbe::NoSession;
        }

        match api.current_user().await {
            Ok(user) => {
                tracing::info!(username = %user.username, "Existing session is valid");
                SessionProbe::Active(user)
            }
            Err(e) => {
                tracing::info!("No valid session found: {}", e);
                SessionProbe::NoSession
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryCookieJar;
    use crate::testing::FakeApi;

    #[test]
    fn test_set_get_clear() {
        let mut sessions = SessionManager::new(MemoryCookieJar::new(), false);

        assert_eq!(sessions.get_session(), None);
        sessions.set_session("tok-1", true).unwrap();
        assert_eq!(sessions.get_session().as_deref(), Some("tok-1"));

        sessions.clear_session().unwrap();
        assert_eq!(sessions.get_session(), None);
    }

    #[tokio::test]
    async fn test_no_cookie_skips_probe() {
        let api = FakeApi::new();
        let sessions = SessionManager::new(MemoryCookieJar::new(), false);

        assert_eq!(sessions.check_existing(&api).await, SessionProbe::NoSession);
        assert_eq!(api.calls("current_user"), 0);
    }

    #[tokio::test]
    async fn test_valid_cookie_is_active() {
        let api = FakeApi::new();
        let mut sessions = SessionManager::new(MemoryCookieJar::new(), false);
        sessions.set_session("tok-1", false).unwrap();

        match sessions.check_existing(&api).await {
            SessionProbe::Active(user) => assert_eq!(user.username, "dr.kaya"),
            other => panic!("unexpected probe: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_probe_failure_fails_closed() {
        let api = FakeApi::new();
        api.fail_connection(true);
        let mut sessions = SessionManager::new(MemoryCookieJar::new(), false);
        sessions.set_session("tok-1", false).unwrap();

        assert_eq!(sessions.check_existing(&api).await, SessionProbe::NoSession);
        assert_eq!(api.calls("current_user"), 1);
    }
}
