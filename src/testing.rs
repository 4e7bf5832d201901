//! In-memory backend used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{
    ChangePasswordRequest, ClientError, ClientResult, CreatedPatient, DashboardApi, Hospital,
    HourlyMeasurement, HourlyResult, HourlySubmission, LoginRequest, LoginResponse, NewPatient,
    Patient, PatientDetail, PatientKey, User, VitalSigns,
};

/// Fake backend: a patient store plus knobs for failures and ordering
pub(crate) struct FakeApi {
    patients: RefCell<BTreeMap<PatientKey, PatientDetail>>,
    next_key: Cell<PatientKey>,
    offline: Cell<bool>,
    rejections: RefCell<BTreeMap<String, String>>,
    calls: RefCell<BTreeMap<String, usize>>,
    last_login: RefCell<Option<LoginRequest>>,
    last_submission: RefCell<Option<(PatientKey, HourlySubmission)>>,
    prediction: Cell<f64>,
    detail_gates: RefCell<BTreeMap<PatientKey, Rc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self {
            patients: RefCell::new(BTreeMap::new()),
            next_key: Cell::new(12),
            offline: Cell::new(false),
            rejections: RefCell::new(BTreeMap::new()),
            calls: RefCell::new(BTreeMap::new()),
            last_login: RefCell::new(None),
            last_submission: RefCell::new(None),
            prediction: Cell::new(0.1),
            detail_gates: RefCell::new(BTreeMap::new()),
        };
        let key = api.insert("P-12", "Mehmet Demir");
        api.add_hour(key, 0.08);
        api.add_hour(key, 0.15);
        api
    }

    /// Add a patient record directly, returning its key
    pub fn insert(&self, patient_id: &str, name: &str) -> PatientKey {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.patients.borrow_mut().insert(
            key,
            PatientDetail {
                patient: Patient {
                    id: key,
                    patient_id: patient_id.to_string(),
                    name: name.to_string(),
                    age: None,
                    gender: None,
                    admission_time: Some("2024-03-01T10:00:00".to_string()),
                    created_at: None,
                    total_hours: None,
                    latest_prediction: None,
                    latest_risk_level: None,
                },
                hourly_data: Vec::new(),
            },
        );
        key
    }

    /// Append the next hour with the given prediction
    pub fn add_hour(&self, key: PatientKey, prediction: f64) {
        if let Some(detail) = self.patients.borrow_mut().get_mut(&key) {
            let hour = detail.hourly_data.iter().map(|h| h.hour).max().unwrap_or(0) + 1;
            detail.hourly_data.push(measurement(hour, VitalSigns::new(), prediction));
        }
    }

    pub fn fail_connection(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Make `op` answer with a backend error carrying `message`
    pub fn reject(&self, op: &str, message: &str) {
        self.rejections
            .borrow_mut()
            .insert(op.to_string(), message.to_string());
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.borrow().get(op).copied().unwrap_or(0)
    }

    pub fn last_login(&self) -> Option<LoginRequest> {
        self.last_login.borrow().clone()
    }

    pub fn last_submission(&self) -> Option<(PatientKey, HourlySubmission)> {
        self.last_submission.borrow().clone()
    }

    /// Prediction returned for the next submitted hours
    pub fn set_prediction(&self, prediction: f64) {
        self.prediction.set(prediction);
    }

    /// Hold `get_patient(key)` until the returned gate is notified
    pub fn gate_detail(&self, key: PatientKey) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.detail_gates.borrow_mut().insert(key, gate.clone());
        gate
    }

    fn enter(&self, op: &str) -> ClientResult<()> {
        *self.calls.borrow_mut().entry(op.to_string()).or_default() += 1;

        if self.offline.get() {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        if let Some(message) = self.rejections.borrow().get(op) {
            return Err(ClientError::backend(Some(400), message.clone()));
        }
        Ok(())
    }

    fn summary(detail: &PatientDetail) -> Patient {
        let latest = detail.hourly_data.iter().max_by_key(|h| h.hour);
        Patient {
            total_hours: Some(detail.hourly_data.len() as u32),
            latest_prediction: latest.map(|h| h.prediction),
            latest_risk_level: latest.map(|h| h.risk_level.clone()),
            ..detail.patient.clone()
        }
    }
}

fn risk_level(prediction: f64) -> &'static str {
    if prediction >= 0.5 {
        "Yüksek Risk"
    } else if prediction >= 0.1799 {
        "Orta Risk"
    } else {
        "Düşük Risk"
    }
}

fn measurement(hour: u32, vital_signs: VitalSigns, prediction: f64) -> HourlyMeasurement {
    HourlyMeasurement {
        id: Some(hour as i64),
        hour,
        vital_signs,
        prediction,
        risk_level: risk_level(prediction).to_string(),
        timestamp: Some("2024-03-01 12:00:00".to_string()),
    }
}

pub(crate) fn test_user() -> User {
    User {
        id: 1,
        username: "dr.kaya".to_string(),
        full_name: Some("Dr. Ayşe Kaya".to_string()),
        email: None,
        hospital_id: Some(1),
        hospital_name: Some("Ankara Şehir Hastanesi".to_string()),
        hospital_code: Some("ANK01".to_string()),
        role: Some("doctor".to_string()),
    }
}

#[async_trait(?Send)]
impl DashboardApi for FakeApi {
    async fn list_hospitals(&self) -> ClientResult<Vec<Hospital>> {
        self.enter("list_hospitals")?;
        Ok(vec![Hospital {
            id: 1,
            name: "Ankara Şehir Hastanesi".to_string(),
            code: "ANK01".to_string(),
            city: Some("Ankara".to_string()),
        }])
    }

    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        *self.last_login.borrow_mut() = Some(request.clone());
        self.enter("login")?;
        Ok(LoginResponse {
            session_id: "tok-1".to_string(),
            user: test_user(),
        })
    }

    async fn current_user(&self) -> ClientResult<User> {
        self.enter("current_user")?;
        Ok(test_user())
    }

    async fn logout(&self) -> ClientResult<()> {
        self.enter("logout")
    }

    async fn change_password(&self, _request: &ChangePasswordRequest) -> ClientResult<()> {
        self.enter("change_password")
    }

    async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        self.enter("list_patients")?;
        Ok(self.patients.borrow().values().map(Self::summary).collect())
    }

    async fn create_patient(&self, patient: &NewPatient) -> ClientResult<CreatedPatient> {
        self.enter("create_patient")?;
        let duplicate = self
            .patients
            .borrow()
            .values()
            .any(|p| p.patient.patient_id == patient.patient_id);
        if duplicate {
            return Err(ClientError::backend(Some(400), "Bu hasta ID zaten mevcut"));
        }

        let key = self.insert(&patient.patient_id, &patient.name);
        if let Some(detail) = self.patients.borrow_mut().get_mut(&key) {
            detail.patient.age = patient.age;
            detail.patient.gender = patient.gender.clone();
        }
        Ok(CreatedPatient {
            patient_id: key,
            message: Some("Patient created successfully".to_string()),
        })
    }

    async fn get_patient(&self, id: PatientKey) -> ClientResult<PatientDetail> {
        self.enter("get_patient")?;
        let gate = self.detail_gates.borrow_mut().remove(&id);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.patients
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| ClientError::backend(Some(404), "Patient not found"))
    }

    async fn delete_patient(&self, id: PatientKey) -> ClientResult<()> {
        self.enter("delete_patient")?;
        self.patients
            .borrow_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ClientError::backend(Some(404), "Patient not found"))
    }

    async fn submit_hourly(
        &self,
        id: PatientKey,
        submission: &HourlySubmission,
    ) -> ClientResult<HourlyResult> {
        *self.last_submission.borrow_mut() = Some((id, submission.clone()));
        self.enter("submit_hourly")?;

        let prediction = self.prediction.get();
        let mut patients = self.patients.borrow_mut();
        let detail = patients
            .get_mut(&id)
            .ok_or_else(|| ClientError::backend(Some(404), "Patient not found"))?;
        detail.hourly_data.push(measurement(
            submission.hour,
            submission.vital_signs.clone(),
            prediction,
        ));
        detail.hourly_data.sort_by_key(|h| h.hour);

        Ok(HourlyResult {
            hour: Some(submission.hour),
            prediction,
            risk_level: Some(risk_level(prediction).to_string()),
            risk_color: None,
            is_sepsis_risk: Some(prediction >= 0.1799),
            message: Some("Data saved successfully".to_string()),
        })
    }
}
