//! Backend REST API Client
//!
//! reqwest implementation of [`DashboardApi`] for native callers.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::dto::{CurrentUser, HospitalList, PatientList};
use super::{
    decode_envelope, Ack, ChangePasswordRequest, ClientError, ClientResult, CreatedPatient,
    DashboardApi, Hospital, HourlyResult, HourlySubmission, LoginRequest, LoginResponse,
    NewPatient, Patient, PatientDetail, PatientKey, User, SESSION_COOKIE, SESSION_HEADER,
};

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct PatientClientConfig {
    /// Backend base URL (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Session token sent with every request
    pub session_token: Option<String>,
    /// Request timeout in seconds; `None` keeps the transport default
    pub request_timeout_secs: Option<u64>,
}

impl Default for PatientClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            session_token: None,
            request_timeout_secs: None,
        }
    }
}

/// Sepsis backend REST client
#[derive(Debug, Clone)]
pub struct PatientClient {
    client: Client,
    config: PatientClientConfig,
}

impl PatientClient {
    /// Create a new client with the given configuration
    pub fn new(mut config: PatientClientConfig) -> ClientResult<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Same client, authenticated with `token`
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.config.session_token = Some(token.into());
        self
    }

    pub fn config(&self) -> &PatientClientConfig {
        &self.config
    }

    /// Whether requests go over an encrypted transport
    pub fn is_secure(&self) -> bool {
        self.config.base_url.starts_with("https://")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.session_token {
            Some(token) => request
                .header(SESSION_HEADER, token)
                .header(reqwest::header::COOKIE, format!("{}={}", SESSION_COOKIE, token)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(request).send().await.map_err(|e| {
            tracing::warn!("Backend request failed: {}", e);
            ClientError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        tracing::debug!(status, path = %url, "Backend response");

        decode_envelope(status, &body)
    }
}

#[async_trait(?Send)]
impl DashboardApi for PatientClient {
    async fn list_hospitals(&self) -> ClientResult<Vec<Hospital>> {
        let list: HospitalList = self.send(self.client.get(self.url("/api/hospitals"))).await?;
        Ok(list.hospitals)
    }

    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.send(self.client.post(self.url("/api/auth/login")).json(request))
            .await
    }

    async fn current_user(&self) -> ClientResult<User> {
        let me: CurrentUser = self.send(self.client.get(self.url("/api/auth/me"))).await?;
        Ok(me.user)
    }

    async fn logout(&self) -> ClientResult<()> {
        let _: Ack = self.send(self.client.post(self.url("/api/auth/logout"))).await?;
        Ok(())
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> ClientResult<()> {
        let _: Ack = self
            .send(
                self.client
                    .post(self.url("/api/auth/change-password"))
                    .json(request),
            )
            .await?;
        Ok(())
    }

    async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        let list: PatientList = self.send(self.client.get(self.url("/api/patients"))).await?;
        Ok(list.patients)
    }

    async fn create_patient(&self, patient: &NewPatient) -> ClientResult<CreatedPatient> {
        self.send(self.client.post(self.url("/api/patients")).json(patient))
            .await
    }

    async fn get_patient(&self, id: PatientKey) -> ClientResult<PatientDetail> {
        self.send(self.client.get(self.url(&format!("/api/patients/{}", id))))
            .await
    }

    async fn delete_patient(&self, id: PatientKey) -> ClientResult<()> {
        let _: Ack = self
            .send(self.client.delete(self.url(&format!("/api/patients/{}", id))))
            .await?;
        Ok(())
    }

    async fn submit_hourly(
        &self,
        id: PatientKey,
        submission: &HourlySubmission,
    ) -> ClientResult<HourlyResult> {
        self.send(
            self.client
                .post(self.url(&format!("/api/patients/{}/hourly-data", id)))
                .json(submission),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VitalSigns;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let header = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
        let cookie = headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok());

        if header == Some("tok-1") && cookie == Some("session_id=tok-1") {
            (
                StatusCode::OK,
                Json(json!({"success": true, "user": {"id": 1, "username": "dr.kaya"}})),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid or expired session"})),
            )
        }
    }

    async fn create_patient(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["patient_id"] == "DUP" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "error": "Bu hasta ID zaten mevcut"})),
            );
        }
        (
            StatusCode::CREATED,
            Json(json!({"success": true, "patient_id": 12, "message": "Hasta başarıyla eklendi"})),
        )
    }

    async fn get_patient(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
        if id != 12 {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"success": false, "error": "Hasta bulunamadı"})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "patient": {"id": 12, "patient_id": "P-12", "name": "Mehmet Demir", "age": 71, "gender": "M"},
                "hourly_data": [
                    {"id": 1, "hour": 1, "vital_signs": {"HR": 95.0}, "prediction": 0.08, "risk_level": "Çok Düşük"},
                    {"id": 2, "hour": 2, "vital_signs": {"HR": 118.0, "Lactate": null}, "prediction": 0.23, "risk_level": "Düşük"}
                ]
            })),
        )
    }

    async fn submit_hourly(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
        Json(json!({
            "success": true,
            "hour": body["hour"],
            "prediction": if id == 12 { 0.23 } else { 0.0 },
            "risk_level": "Düşük",
            "is_sepsis_risk": true
        }))
    }

    fn router() -> Router {
        Router::new()
            .route(
                "/api/hospitals",
                get(|| async {
                    Json(json!({"success": true, "hospitals": [
                        {"id": 1, "name": "Ankara Şehir", "code": "ANK01", "city": "Ankara"}
                    ]}))
                }),
            )
            .route("/api/auth/me", get(me))
            .route(
                "/api/patients",
                get(|| async { Json(json!({"success": true, "patients": []})) }).post(create_patient),
            )
            .route(
                "/api/patients/:id",
                get(get_patient).delete(|| async {
                    Json(json!({"success": true, "message": "Hasta başarıyla silindi"}))
                }),
            )
            .route("/api/patients/:id/hourly-data", post(submit_hourly))
            .route("/broken", get(|| async { "not json" }))
    }

    async fn spawn_backend() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router()).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn client(base_url: String) -> PatientClient {
        PatientClient::new(PatientClientConfig {
            base_url,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_hospitals() {
        let api = client(spawn_backend().await);

        let hospitals = api.list_hospitals().await.unwrap();

        assert_eq!(hospitals.len(), 1);
        assert_eq!(hospitals[0].label(), "Ankara Şehir (ANK01)");
    }

    #[tokio::test]
    async fn test_session_sent_as_header_and_cookie() {
        let base = spawn_backend().await;

        let anonymous = client(base.clone());
        let err = anonymous.current_user().await.unwrap_err();
        assert_eq!(err.status(), Some(401));

        let authed = client(base).with_session("tok-1");
        let user = authed.current_user().await.unwrap();
        assert_eq!(user.username, "dr.kaya");
    }

    #[tokio::test]
    async fn test_create_patient_duplicate_is_verbatim() {
        let api = client(spawn_backend().await);

        let created = api
            .create_patient(&NewPatient::admitted_now("P-12", "Mehmet", None, None))
            .await
            .unwrap();
        assert_eq!(created.patient_id, 12);

        let err = api
            .create_patient(&NewPatient::admitted_now("DUP", "Mehmet", None, None))
            .await
            .unwrap_err();
        assert_eq!(err.backend_message(), Some("Bu hasta ID zaten mevcut"));
    }

    #[tokio::test]
    async fn test_get_patient_and_history() {
        let api = client(spawn_backend().await);

        let detail = api.get_patient(12).await.unwrap();
        assert_eq!(detail.patient.name, "Mehmet Demir");
        assert_eq!(detail.hourly_data.len(), 2);
        assert_eq!(detail.hourly_data[1].vital_signs.get("Lactate"), Some(&None));

        let missing = api.get_patient(99).await.unwrap_err();
        assert_eq!(missing.backend_message(), Some("Hasta bulunamadı"));
    }

    #[tokio::test]
    async fn test_submit_hourly_and_delete() {
        let api = client(spawn_backend().await);

        let mut vitals = VitalSigns::new();
        vitals.insert("HR".to_string(), Some(118.0));
        let result = api
            .submit_hourly(12, &HourlySubmission { hour: 3, vital_signs: vitals })
            .await
            .unwrap();

        assert_eq!(result.hour, Some(3));
        assert!((result.prediction - 0.23).abs() < f64::EPSILON);

        api.delete_patient(12).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_body_is_connection_error() {
        let base = spawn_backend().await;
        let api = client(base);

        let err = api
            .send::<Ack>(api.client.get(api.url("/broken")))
            .await
            .unwrap_err();

        assert!(err.is_connection_error());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let api = client("http://127.0.0.1:9".to_string());

        let err = api.list_patients().await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let api = client("https://sepsis.example.org/".to_string());
        assert_eq!(api.url("/api/patients"), "https://sepsis.example.org/api/patients");
        assert!(api.is_secure());
    }
}
