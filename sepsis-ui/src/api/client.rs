//! HTTP API Client
//!
//! gloo-net implementation of [`DashboardApi`]. Requests carry the session
//! cookie (credentials included) and the `X-Session-ID` header read from
//! `document.cookie` at send time, so a fresh login is picked up without
//! rebuilding the client.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use web_sys::RequestCredentials;

use sepsis_dashboard::api::{
    decode_envelope, Ack, ChangePasswordRequest, ClientError, ClientResult, CreatedPatient,
    CurrentUser, DashboardApi, Hospital, HospitalList, HourlyResult, HourlySubmission,
    LoginRequest, LoginResponse, NewPatient, Patient, PatientDetail, PatientKey, PatientList,
    User, SESSION_COOKIE, SESSION_HEADER,
};
use sepsis_dashboard::session::read_cookie;

use crate::state::browser::document_cookies;

/// localStorage key overriding the API base URL
const API_URL_KEY: &str = "sepsis_api_url";

/// Get the API base URL from local storage, or the page origin
pub fn get_api_base() -> String {
    let window = match web_sys::window() {
        Some(window) => window,
        None => return String::new(),
    };

    let url = match window.local_storage() {
        Ok(Some(storage)) => storage.get_item(API_URL_KEY).ok().flatten(),
        _ => None,
    };
    let url = url.unwrap_or_else(|| window.location().origin().unwrap_or_default());

    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Backend client for the browser
#[derive(Debug, Clone)]
pub struct GlooClient {
    base: String,
}

impl GlooClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client for the configured (or same-origin) backend
    pub fn from_storage() -> Self {
        Self::new(get_api_base())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.credentials(RequestCredentials::Include);
        match read_cookie(&document_cookies(), SESSION_COOKIE) {
            Some(token) => builder.header(SESSION_HEADER, &token),
            None => builder,
        }
    }

    fn build(&self, builder: RequestBuilder) -> ClientResult<Request> {
        self.prepare(builder)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    fn build_json<B: serde::Serialize>(&self, builder: RequestBuilder, body: &B) -> ClientResult<Request> {
        self.prepare(builder)
            .json(body)
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> ClientResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        decode_envelope(status, &body)
    }
}

#[async_trait(?Send)]
impl DashboardApi for GlooClient {
    async fn list_hospitals(&self) -> ClientResult<Vec<Hospital>> {
        let request = self.build(Request::get(&self.url("/api/hospitals")))?;
        let list: HospitalList = self.send(request).await?;
        Ok(list.hospitals)
    }

    async fn login(&self, body: &LoginRequest) -> ClientResult<LoginResponse> {
        let request = self.build_json(Request::post(&self.url("/api/auth/login")), body)?;
        self.send(request).await
    }

    async fn current_user(&self) -> ClientResult<User> {
        let request = self.build(Request::get(&self.url("/api/auth/me")))?;
        let me: CurrentUser = self.send(request).await?;
        Ok(me.user)
    }

    async fn logout(&self) -> ClientResult<()> {
        let request = self.build(Request::post(&self.url("/api/auth/logout")))?;
        let _: Ack = self.send(request).await?;
        Ok(())
    }

    async fn change_password(&self, body: &ChangePasswordRequest) -> ClientResult<()> {
        let request =
            self.build_json(Request::post(&self.url("/api/auth/change-password")), body)?;
        let _: Ack = self.send(request).await?;
        Ok(())
    }

    async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        let request = self.build(Request::get(&self.url("/api/patients")))?;
        let list: PatientList = self.send(request).await?;
        Ok(list.patients)
    }

    async fn create_patient(&self, patient: &NewPatient) -> ClientResult<CreatedPatient> {
        let request = self.build_json(Request::post(&self.url("/api/patients")), patient)?;
        self.send(request).await
    }

    async fn get_patient(&self, id: PatientKey) -> ClientResult<PatientDetail> {
        let request = self.build(Request::get(&self.url(&format!("/api/patients/{}", id))))?;
        self.send(request).await
    }

    async fn delete_patient(&self, id: PatientKey) -> ClientResult<()> {
        let request = self.build(Request::delete(&self.url(&format!("/api/patients/{}", id))))?;
        let _: Ack = self.send(request).await?;
        Ok(())
    }

    async fn submit_hourly(
        &self,
        id: PatientKey,
        submission: &HourlySubmission,
    ) -> ClientResult<HourlyResult> {
        let url = self.url(&format!("/api/patients/{}/hourly-data", id));
        let request = self.build_json(Request::post(&url), submission)?;
        self.send(request).await
    }
}
