//! Transient notifications (toasts).

use serde::Serialize;

pub const CONNECTION_ERROR: &str = "Bağlantı hatası";
pub const PATIENTS_LOAD_FAILED: &str = "Hastalar yüklenemedi";
pub const DETAIL_LOAD_FAILED: &str = "Hasta detayları yüklenemedi";
pub const PATIENT_ADDED: &str = "Hasta başarıyla eklendi";
pub const PATIENT_DELETED: &str = "Hasta silindi";

/// How long a toast stays on screen
pub const TOAST_DURATION_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
            NotificationLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    /// CSS classes of a visible toast
    pub fn css_class(&self) -> String {
        format!("toast toast-{} show", self.level.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}
