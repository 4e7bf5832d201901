//! Session cookie encoding and `document.cookie`-style parsing.

use serde::{Deserialize, Serialize};

/// Lifetime of a "remember me" session: 30 days
pub const REMEMBER_ME_MAX_AGE: i64 = 30 * 24 * 60 * 60;

/// A cookie write, as it would be assigned to `document.cookie`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    /// Seconds to live; `None` for a session-lifetime cookie, `0` to expire
    pub max_age: Option<i64>,
    pub secure: bool,
}

impl SessionCookie {
    /// Cookie carrying a freshly issued session token
    pub fn issue(name: &str, token: &str, remember_me: bool, secure: bool) -> Self {
        Self {
            name: name.to_string(),
            value: token.to_string(),
            max_age: remember_me.then_some(REMEMBER_ME_MAX_AGE),
            secure,
        }
    }

    /// Cookie that removes `name` immediately
    pub fn expire(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            max_age: Some(0),
            secure: false,
        }
    }

    pub fn is_expiry(&self) -> bool {
        matches!(self.max_age, Some(age) if age <= 0)
    }

    /// Serialized cookie string
    pub fn to_header(&self) -> String {
        let mut cookie = format!("{}={}; path=/; SameSite=Strict", self.name, self.value);

        if let Some(max_age) = self.max_age {
            cookie.push_str(&format!("; max-age={}", max_age));
        }

        if self.secure {
            cookie.push_str("; Secure");
        }

        cookie
    }
}

/// Read cookie `name` from a `name=value; other=value` string.
///
/// Returns `None` when the cookie is absent, empty, or ambiguous (set twice).
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    let mut matches = cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| *key == name)
        .map(|(_, value)| value);

    let value = matches.next()?;
    if matches.next().is_some() || value.is_empty() {
        return None;
    }
    Some(value.to_string())
}
