//! Session Management
//!
//! Opaque session token kept in a cookie, plus a display-only copy of the
//! user object.
//!
//! - **Cookie**: `session_id=<token>; path=/; SameSite=Strict`, 30-day
//!   `max-age` with "remember me", `Secure` over https
//! - **Stores**: where cookies and the user cache live (memory, files, browser)
//! - **Manager**: get / set / clear / probe the session
//! - **Login**: form pre-checks, login, logout, password change

mod cookie;
mod login;
mod manager;
mod store;

pub use cookie::{read_cookie, SessionCookie, REMEMBER_ME_MAX_AGE};
pub use login::{
    change_password, login, logout, LoginError, LoginForm, PasswordChangeError, MIN_PASSWORD_LEN,
};
pub use manager::{SessionManager, SessionProbe};
pub use store::{CookieStore, MemoryCookieJar, MemoryUserCache, StoreError, UserCache};

#[cfg(feature = "native")]
pub use store::{FileCookieJar, FileUserCache};
