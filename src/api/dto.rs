//! Data Transfer Objects
//!
//! Request and response payloads exchanged with the sepsis prediction backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Backend primary key of a patient (used in URL paths)
pub type PatientKey = i64;

/// Biomarker name -> value; `None` means intentionally omitted
pub type VitalSigns = BTreeMap<String, Option<f64>>;

/// Selectable hospital on the login form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub city: Option<String>,
}

impl Hospital {
    /// Label shown in the hospital dropdown
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

/// Authenticated user as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub hospital_id: Option<i64>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub hospital_code: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Patient record. Summary fields are only filled on the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientKey,
    pub patient_id: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub admission_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub total_hours: Option<u32>,
    #[serde(default)]
    pub latest_prediction: Option<f64>,
    #[serde(default)]
    pub latest_risk_level: Option<String>,
}

/// One hour of biomarker values with the server-computed prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyMeasurement {
    #[serde(default)]
    pub id: Option<i64>,
    pub hour: u32,
    #[serde(default)]
    pub vital_signs: VitalSigns,
    #[serde(default)]
    pub prediction: f64,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Patient plus full measurement history, ordered by hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetail {
    pub patient: Patient,
    #[serde(default)]
    pub hourly_data: Vec<HourlyMeasurement>,
}

/// Body of `POST /api/patients`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub patient_id: String,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub admission_time: String,
}

impl NewPatient {
    /// New patient admitted now
    pub fn admitted_now(patient_id: &str, name: &str, age: Option<u32>, gender: Option<String>) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            name: name.to_string(),
            age,
            gender: gender.filter(|g| !g.trim().is_empty()),
            admission_time: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response of `POST /api/patients`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPatient {
    /// Backend key of the new record
    pub patient_id: PatientKey,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/patients/{id}/hourly-data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySubmission {
    pub hour: u32,
    pub vital_signs: VitalSigns,
}

/// Prediction returned for a submitted hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyResult {
    #[serde(default)]
    pub hour: Option<u32>,
    pub prediction: f64,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub risk_color: Option<String>,
    #[serde(default)]
    pub is_sepsis_risk: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub hospital_id: i64,
    pub remember_me: bool,
}

/// Successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub user: User,
}

/// Body of `POST /api/auth/change-password`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Body of `GET /api/hospitals`
#[derive(Debug, Deserialize)]
pub struct HospitalList {
    pub hospitals: Vec<Hospital>,
}

/// Body of `GET /api/patients`
#[derive(Debug, Deserialize)]
pub struct PatientList {
    pub patients: Vec<Patient>,
}

/// Body of `GET /api/auth/me`
#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_list_entry_deserializes() {
        let json = r#"{
            "id": 7, "patient_id": "P-007", "name": "Ayşe Yılmaz",
            "age": null, "gender": "F", "admission_time": "2024-03-01T10:00:00",
            "total_hours": 3, "latest_prediction": 0.42, "latest_risk_level": "Orta",
            "created_at": "2024-03-01 10:00:00"
        }"#;

        let patient: Patient = serde_json::from_str(json).unwrap();

        assert_eq!(patient.id, 7);
        assert_eq!(patient.age, None);
        assert_eq!(patient.total_hours, Some(3));
        assert_eq!(patient.latest_risk_level.as_deref(), Some("Orta"));
    }

    #[test]
    fn test_hourly_measurement_keeps_null_vitals() {
        let json = r#"{
            "id": 1, "hour": 2, "vital_signs": {"HR": 92.0, "Lactate": null},
            "prediction": 0.12, "risk_level": "Düşük", "timestamp": "2024-03-01 12:00:00"
        }"#;

        let m: HourlyMeasurement = serde_json::from_str(json).unwrap();

        assert_eq!(m.vital_signs.get("HR"), Some(&Some(92.0)));
        assert_eq!(m.vital_signs.get("Lactate"), Some(&None));
    }

    #[test]
    fn test_submission_serializes_nulls() {
        let mut vitals = VitalSigns::new();
        vitals.insert("HR".to_string(), Some(88.0));
        vitals.insert("PCT".to_string(), None);

        let body = serde_json::to_value(HourlySubmission { hour: 3, vital_signs: vitals }).unwrap();

        assert_eq!(body["hour"], 3);
        assert!(body["vital_signs"]["PCT"].is_null());
    }

    #[test]
    fn test_new_patient_drops_blank_gender() {
        let p = NewPatient::admitted_now("P-1", "Test", Some(60), Some(" ".to_string()));
        assert_eq!(p.gender, None);
        assert!(chrono::DateTime::parse_from_rfc3339(&p.admission_time).is_ok());
    }

    #[test]
    fn test_hospital_label() {
        let h = Hospital {
            id: 1,
            name: "Ankara Şehir".to_string(),
            code: "ANK01".to_string(),
            city: None,
        };
        assert_eq!(h.label(), "Ankara Şehir (ANK01)");
    }
}
