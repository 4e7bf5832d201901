//! Browser Stores
//!
//! Session cookie in `document.cookie`, user display cache in `localStorage`.

use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use sepsis_dashboard::api::User;
use sepsis_dashboard::session::{CookieStore, SessionCookie, SessionManager, StoreError, UserCache};

/// localStorage key of the cached user object
const USER_KEY: &str = "user";

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<HtmlDocument>()
        .ok()
}

fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))
}

/// Current `document.cookie`, empty when unavailable
pub fn document_cookies() -> String {
    html_document()
        .and_then(|doc| doc.cookie().ok())
        .unwrap_or_default()
}

/// Whether the page itself is served over https
pub fn page_is_secure() -> bool {
    web_sys::window()
        .and_then(|w| w.location().protocol().ok())
        .map_or(false, |p| p == "https:")
}

/// `document.cookie` as a [`CookieStore`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookieStore;

impl CookieStore for DocumentCookieStore {
    fn cookie_string(&self) -> String {
        document_cookies()
    }

    fn write(&mut self, cookie: &SessionCookie) -> Result<(), StoreError> {
        let doc = html_document().ok_or_else(|| StoreError::Unavailable("document".to_string()))?;
        doc.set_cookie(&cookie.to_header())
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

/// Session manager over the page's cookies
pub fn browser_sessions() -> SessionManager<DocumentCookieStore> {
    SessionManager::new(DocumentCookieStore, page_is_secure())
}

/// `localStorage` as a [`UserCache`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageUserCache;

impl UserCache for LocalStorageUserCache {
    fn load(&self) -> Option<User> {
        let raw = local_storage().ok()?.get_item(USER_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    fn store(&mut self, user: &User) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user)?;
        local_storage()?
            .set_item(USER_KEY, &raw)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        local_storage()?
            .remove_item(USER_KEY)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}
