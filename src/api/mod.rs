//! Patient Data Client
//!
//! Typed access to the sepsis prediction backend's REST surface.
//!
//! # Endpoints
//!
//! ## Authentication
//! - `GET /api/hospitals` - Hospitals for the login dropdown
//! - `POST /api/auth/login` - Log in, returns `session_id` and user
//! - `GET /api/auth/me` - Session probe
//! - `POST /api/auth/logout` - Invalidate the session
//! - `POST /api/auth/change-password` - Change the current user's password
//!
//! ## Patients
//! - `GET /api/patients` - List with summary fields
//! - `POST /api/patients` - Create a patient
//! - `GET /api/patients/:id` - Patient plus hourly history
//! - `DELETE /api/patients/:id` - Delete a patient
//! - `POST /api/patients/:id/hourly-data` - Submit one hour, returns prediction
//!
//! Every call is a single request: no retries and no timeout beyond the
//! transport default. Callers re-fetch full state after a mutation.

pub mod dto;
pub mod error;

#[cfg(feature = "native")]
mod client;

#[cfg(feature = "native")]
pub use client::{PatientClient, PatientClientConfig};

pub use dto::{
    ChangePasswordRequest, CreatedPatient, CurrentUser, Hospital, HospitalList,
    HourlyMeasurement, HourlyResult, HourlySubmission, LoginRequest, LoginResponse, NewPatient,
    Patient, PatientDetail, PatientKey, PatientList, User, VitalSigns,
};
pub use error::{ClientError, ClientResult};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Name of the session cookie shared with the backend
pub const SESSION_COOKIE: &str = "session_id";

/// Header carrying the session token when cookies are not forwarded
pub const SESSION_HEADER: &str = "X-Session-ID";

/// Message used when an error response carries no `error` field
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Backend operations used by the dashboard.
///
/// Futures are not `Send`: the dashboard runs on a single-threaded event loop
/// (the browser, or a current-thread runtime natively).
#[async_trait(?Send)]
pub trait DashboardApi {
    async fn list_hospitals(&self) -> ClientResult<Vec<Hospital>>;

    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse>;

    /// Authenticated probe of the current session
    async fn current_user(&self) -> ClientResult<User>;

    async fn logout(&self) -> ClientResult<()>;

    async fn change_password(&self, request: &ChangePasswordRequest) -> ClientResult<()>;

    async fn list_patients(&self) -> ClientResult<Vec<Patient>>;

    async fn create_patient(&self, patient: &NewPatient) -> ClientResult<CreatedPatient>;

    async fn get_patient(&self, id: PatientKey) -> ClientResult<PatientDetail>;

    async fn delete_patient(&self, id: PatientKey) -> ClientResult<()>;

    async fn submit_hourly(
        &self,
        id: PatientKey,
        submission: &HourlySubmission,
    ) -> ClientResult<HourlyResult>;
}

/// Decode a backend response body.
///
/// The backend wraps every payload as `{"success": bool, "error"?: string, ...}`;
/// `success: false` (or a missing flag on an error status) becomes
/// [`ClientError::Backend`] with the backend's message verbatim.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> ClientResult<T> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ClientError::Parse(e.to_string()))?;

    if !value.is_object() {
        return Err(ClientError::Parse("expected a JSON object".to_string()));
    }

    let success = value
        .get("success")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or((200..300).contains(&status));

    if !success || !(200..300).contains(&status) {
        let message = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(UNKNOWN_ERROR)
            .to_string();
        let details = value
            .get("details")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        return Err(ClientError::Backend {
            status: Some(status),
            message,
            details,
        });
    }

    serde_json::from_value(value).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Payload-less success (`{"success": true, "message": ...}`)
#[derive(Debug, serde::Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
