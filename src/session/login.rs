//! Login, logout and password change flows.

use thiserror::Error;

use super::manager::SessionManager;
use super::store::{CookieStore, StoreError, UserCache};
use crate::api::{ChangePasswordRequest, ClientError, DashboardApi, LoginRequest, User, UNKNOWN_ERROR};

/// Minimum accepted length for a new password
pub const MIN_PASSWORD_LEN: usize = 8;

/// Raw login form input
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub hospital_id: Option<i64>,
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    /// Pre-checks run before anything is sent to the backend
    pub fn validate(&self) -> Result<LoginRequest, LoginError> {
        let hospital_id = self.hospital_id.ok_or(LoginError::MissingHospital)?;

        if self.username.is_empty() || self.password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        Ok(LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
            hospital_id,
            remember_me: self.remember_me,
        })
    }
}

/// Login failures, displayed as a banner above the form
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Lütfen bir hastane seçiniz")]
    MissingHospital,

    #[error("Kullanıcı adı ve şifre gereklidir")]
    MissingCredentials,

    /// Backend refused the credentials
    #[error("{0}")]
    Rejected(String),

    #[error("Bir hata oluştu. Lütfen tekrar deneyin.")]
    Connection,

    #[error("Oturum kaydedilemedi: {0}")]
    Store(#[from] StoreError),
}

const LOGIN_REJECTED: &str = "Giriş başarısız. Lütfen bilgilerinizi kontrol edin.";

/// Authenticate, then store the session cookie and the user display cache
pub async fn login<A, S, C>(
    api: &A,
    sessions: &mut SessionManager<S>,
    cache: &mut C,
    form: &LoginForm,
) -> Result<User, LoginError>
where
    A: DashboardApi + ?Sized,
    S: CookieStore,
    C: UserCache,
{
    let request = form.validate()?;

    let response = api.login(&request).await.map_err(|e| match e {
        ClientError::Backend { message, .. } if message != UNKNOWN_ERROR => {
            LoginError::Rejected(message)
        }
        ClientError::Backend { .. } => LoginError::Rejected(LOGIN_REJECTED.to_string()),
        e => {
            tracing::error!("Login error: {}", e);
            LoginError::Connection
        }
    })?;

    sessions.set_session(&response.session_id, request.remember_me)?;
    cache.store(&response.user)?;

    tracing::info!(username = %response.user.username, "Logged in");
    Ok(response.user)
}

/// End the session locally even if the backend cannot be reached
pub async fn logout<A, S, C>(
    api: &A,
    sessions: &mut SessionManager<S>,
    cache: &mut C,
) -> Result<(), StoreError>
where
    A: DashboardApi + ?Sized,
    S: CookieStore,
    C: UserCache,
{
    if let Err(e) = api.logout().await {
        tracing::warn!("Logout error: {}", e);
    }

    sessions.clear_session()?;
    cache.clear()?;
    Ok(())
}

/// Password change failures
#[derive(Debug, Error, PartialEq)]
pub enum PasswordChangeError {
    #[error("Current and new passwords required")]
    MissingFields,

    #[error("Password must be at least 8 characters")]
    TooShort,

    #[error("{0}")]
    Rejected(String),

    #[error("Bağlantı hatası")]
    Connection,
}

/// Change the logged-in user's password
pub async fn change_password<A>(
    api: &A,
    current_password: &str,
    new_password: &str,
) -> Result<(), PasswordChangeError>
where
    A: DashboardApi + ?Sized,
{
    if current_password.is_empty() || new_password.is_empty() {
        return Err(PasswordChangeError::MissingFields);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordChangeError::TooShort);
    }

    let request = ChangePasswordRequest {
        current_password: current_password.to_string(),
        new_password: new_password.to_string(),
    };

    api.change_password(&request).await.map_err(|e| match e {
        ClientError::Backend { message, .. } => PasswordChangeError::Rejected(message),
        _ => PasswordChangeError::Connection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryCookieJar, MemoryUserCache};
    use crate::testing::FakeApi;

    fn form() -> LoginForm {
        LoginForm {
            hospital_id: Some(1),
            username: "dr.kaya".to_string(),
            password: "s3cret!".to_string(),
            remember_me: true,
        }
    }

    #[test]
    fn test_form_requires_hospital_first() {
        let form = LoginForm::default();
        assert!(matches!(form.validate(), Err(LoginError::MissingHospital)));
        assert_eq!(
            LoginError::MissingHospital.to_string(),
            "Lütfen bir hastane seçiniz"
        );
    }

    #[test]
    fn test_form_requires_credentials() {
        let form = LoginForm {
            hospital_id: Some(2),
            username: "dr.kaya".to_string(),
            ..Default::default()
        };
        assert!(matches!(form.validate(), Err(LoginError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_login_stores_cookie_and_user() {
        let api = FakeApi::new();
        let mut sessions = SessionManager::new(MemoryCookieJar::new(), false);
        let mut cache = MemoryUserCache::new();

        let user = login(&api, &mut sessions, &mut cache, &form()).await.unwrap();

        assert_eq!(user.username, "dr.kaya");
        assert_eq!(sessions.get_session().as_deref(), Some("tok-1"));
        assert_eq!(cache.load(), Some(user));
        assert_eq!(api.last_login().unwrap().hospital_id, 1);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_backend() {
        let api = FakeApi::new();
        let mut sessions = SessionManager::new(MemoryCookieJar::new(), false);
        let mut cache = MemoryUserCache::new();
        let bad = LoginForm {
            password: String::new(),
            ..form()
        };

        let result = login(&api, &mut sessions, &mut cache, &bad).await;

        assert!(matches!(result, Err(LoginError::MissingCredentials)));
        assert_eq!(api.calls("login"), 0);
    }

    #[tokio::test]
    async fn test_rejected_login_surfaces_backend_message() {
        let api = FakeApi::new();
        api.reject("login", "Invalid username or password");
        let mut sessions = SessionManager::new(MemoryCookieJar::new(), false);
        let mut cache = MemoryUserCache::new();

        let err = login(&api, &mut sessions, &mut cache, &form()).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid username or password");
        assert_eq!(sessions.get_session(), None);
        assert_eq!(cache.load(), None);
    }

    #[tokio::test]
    async fn test_login_connection_failure() {
        let api = FakeApi::new();
        api.fail_connection(true);
        let mut sessions = SessionManager::new(MemoryCookieJar::new(), false);
        let mut cache = MemoryUserCache::new();

        let err = login(&api, &mut sessions, &mut cache, &form()).await.unwrap_err();

        assert!(matches!(err, LoginError::Connection));
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_down() {
        let api = FakeApi::new();
        let mut sessions = SessionManager::new(MemoryCookieJar::new(), false);
        let mut cache = MemoryUserCache::new();
        login(&api, &mut sessions, &mut cache, &form()).await.unwrap();

        api.fail_connection(true);
        logout(&api, &mut sessions, &mut cache).await.unwrap();

        assert_eq!(sessions.get_session(), None);
        assert_eq!(cache.load(), None);
    }

    #[tokio::test]
    async fn test_change_password_checks() {
        let api = FakeApi::new();

        assert_eq!(
            change_password(&api, "", "newpassword").await,
            Err(PasswordChangeError::MissingFields)
        );
        assert_eq!(
            change_password(&api, "old", "short").await,
            Err(PasswordChangeError::TooShort)
        );
        assert_eq!(api.calls("change_password"), 0);

        change_password(&api, "old", "long-enough").await.unwrap();
        assert_eq!(api.calls("change_password"), 1);
    }
}
