//! Cookie and user-cache stores.
//!
//! The browser keeps the session cookie in `document.cookie` and the user
//! object in `localStorage`; natively both live as JSON files in the state
//! directory. The user cache is a display copy only and is never trusted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::cookie::SessionCookie;
use crate::api::User;

/// Errors from a persistent store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere cookies are kept
pub trait CookieStore {
    /// All live cookies as `name=value; name2=value2`
    fn cookie_string(&self) -> String;

    /// Apply a cookie write (an expiry cookie removes the entry)
    fn write(&mut self, cookie: &SessionCookie) -> Result<(), StoreError>;
}

/// Display cache of the logged-in user
pub trait UserCache {
    fn load(&self) -> Option<User>;

    fn store(&mut self, user: &User) -> Result<(), StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// In-memory cookie jar honouring `max-age`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryCookieJar {
    cookies: BTreeMap<String, StoredCookie>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(&mut self, cookie: &SessionCookie, now: DateTime<Utc>) {
        if cookie.is_expiry() {
            self.cookies.remove(&cookie.name);
            return;
        }

        let expires_at = cookie.max_age.map(|secs| now + Duration::seconds(secs));
        self.cookies.insert(
            cookie.name.clone(),
            StoredCookie {
                value: cookie.value.clone(),
                expires_at,
            },
        );
    }

    fn render(&self, now: DateTime<Utc>) -> String {
        self.cookies
            .iter()
            .filter(|(_, c)| c.is_live(now))
            .map(|(name, c)| format!("{}={}", name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl CookieStore for MemoryCookieJar {
    fn cookie_string(&self) -> String {
        self.render(Utc::now())
    }

    fn write(&mut self, cookie: &SessionCookie) -> Result<(), StoreError> {
        self.apply(cookie, Utc::now());
        Ok(())
    }
}

/// In-memory user cache
#[derive(Debug, Clone, Default)]
pub struct MemoryUserCache {
    user: Option<User>,
}

impl MemoryUserCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserCache for MemoryUserCache {
    fn load(&self) -> Option<User> {
        self.user.clone()
    }

    fn store(&mut self, user: &User) -> Result<(), StoreError> {
        self.user = Some(user.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.user = None;
        Ok(())
    }
}

#[cfg(feature = "native")]
pub use file::{FileCookieJar, FileUserCache};

#[cfg(feature = "native")]
mod file {
    use super::*;
    use std::path::{Path, PathBuf};

    const COOKIE_FILE: &str = "cookies.json";
    const USER_FILE: &str = "user.json";

    /// Cookie jar persisted as JSON in the state directory.
    ///
    /// Session-lifetime cookies (no `max-age`) persist until logout: every CLI
    /// invocation is a separate process, so there is no browser session to end.
    #[derive(Debug, Clone)]
    pub struct FileCookieJar {
        path: PathBuf,
    }

    impl FileCookieJar {
        pub fn new(state_dir: &Path) -> Self {
            Self {
                path: state_dir.join(COOKIE_FILE),
            }
        }

        fn read_jar(&self) -> MemoryCookieJar {
            match std::fs::read_to_string(&self.path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!("Ignoring unreadable cookie jar {:?}: {}", self.path, e);
                    MemoryCookieJar::default()
                }),
                Err(_) => MemoryCookieJar::default(),
            }
        }
    }

    impl CookieStore for FileCookieJar {
        fn cookie_string(&self) -> String {
            self.read_jar().cookie_string()
        }

        fn write(&mut self, cookie: &SessionCookie) -> Result<(), StoreError> {
            let mut jar = self.read_jar();
            jar.write(cookie)?;
            write_json(&self.path, &jar)
        }
    }

    /// User cache persisted as JSON in the state directory
    #[derive(Debug, Clone)]
    pub struct FileUserCache {
        path: PathBuf,
    }

    impl FileUserCache {
        pub fn new(state_dir: &Path) -> Self {
            Self {
                path: state_dir.join(USER_FILE),
            }
        }
    }

    impl UserCache for FileUserCache {
        fn load(&self) -> Option<User> {
            let content = std::fs::read_to_string(&self.path).ok()?;
            serde_json::from_str(&content).ok()
        }

        fn store(&mut self, user: &User) -> Result<(), StoreError> {
            write_json(&self.path, user)
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(value)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn user() -> User {
        User {
            id: 4,
            username: "hemsire.ece".to_string(),
            full_name: Some("Ece Arslan".to_string()),
            email: None,
            hospital_id: Some(1),
            hospital_name: None,
            hospital_code: None,
            role: Some("nurse".to_string()),
        }
    }

    #[test]
    fn test_memory_jar_write_and_expire() {
        let mut jar = MemoryCookieJar::new();

        jar.write(&SessionCookie::issue("session_id", "abc", false, false)).unwrap();
        jar.write(&SessionCookie::issue("theme", "dark", true, false)).unwrap();
        assert_eq!(jar.cookie_string(), "session_id=abc; theme=dark");

        jar.write(&SessionCookie::expire("session_id")).unwrap();
        assert_eq!(jar.cookie_string(), "theme=dark");
    }

    #[test]
    fn test_memory_jar_drops_elapsed_cookies() {
        let mut jar = MemoryCookieJar::new();
        let issued = Utc::now() - Duration::days(31);

        jar.apply(&SessionCookie::issue("session_id", "old", true, false), issued);

        assert_eq!(jar.render(issued + Duration::days(29)), "session_id=old");
        assert_eq!(jar.render(Utc::now()), "");
    }

    #[test]
    fn test_file_jar_persists_between_instances() {
        let dir = tempdir().unwrap();

        let mut jar = FileCookieJar::new(dir.path());
        jar.write(&SessionCookie::issue("session_id", "tok", false, false)).unwrap();

        let reopened = FileCookieJar::new(dir.path());
        assert_eq!(reopened.cookie_string(), "session_id=tok");
    }

    #[test]
    fn test_file_user_cache_roundtrip_and_clear() {
        let dir = tempdir().unwrap();
        let mut cache = FileUserCache::new(dir.path());

        assert_eq!(cache.load(), None);
        cache.store(&user()).unwrap();
        assert_eq!(cache.load().unwrap().username, "hemsire.ece");

        cache.clear().unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.load(), None);
    }
}
