//! View Models
//!
//! Display-ready shapes of the backend data. Templates (Leptos components,
//! CLI tables) render these instead of formatting raw DTOs themselves.

use crate::api::{HourlyMeasurement, Patient, PatientKey};
use crate::chart::EMPTY_CHART_MESSAGE;

/// Shown on a patient card when age or gender is missing
pub const NOT_SPECIFIED: &str = "Belirtilmemiş";

/// Shown in the detail header when age or gender is missing
pub const UNKNOWN_SHORT: &str = "?";

/// Shown for a biomarker that was omitted in an hour
pub const MISSING_VALUE: &str = "N/A";

pub const NO_PATIENTS: &str = "Henüz hasta kaydı yok";
pub const NO_HOURLY_DATA: &str = "Henüz saatlik veri yok";

/// Badge class suffix for a risk level: lower-cased, first space -> `-`
pub fn risk_class(level: &str) -> String {
    level.to_lowercase().replacen(' ', "-", 1)
}

/// Hour suggested for the next submission
pub fn next_hour(history: &[HourlyMeasurement]) -> u32 {
    history.iter().map(|h| h.hour).max().map_or(1, |h| h.saturating_add(1))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskBadge {
    pub label: String,
    pub class: String,
}

impl RiskBadge {
    pub fn new(level: &str) -> Self {
        Self {
            label: level.to_string(),
            class: risk_class(level),
        }
    }

    pub fn css_class(&self) -> String {
        format!("risk-badge risk-{}", self.class)
    }
}

fn describe_age(age: Option<u32>, missing: &str) -> String {
    age.filter(|a| *a > 0)
        .map_or_else(|| missing.to_string(), |a| a.to_string())
}

fn describe_gender(gender: Option<&str>, missing: &str) -> String {
    gender
        .filter(|g| !g.is_empty())
        .unwrap_or(missing)
        .to_string()
}

/// One entry of the patient list
#[derive(Debug, Clone, PartialEq)]
pub struct PatientCard {
    pub key: PatientKey,
    pub name: String,
    pub patient_id: String,
    pub age: String,
    pub gender: String,
    pub total_hours: u32,
    pub risk: Option<RiskBadge>,
    /// e.g. "Risk: 23.4%"; `None` until the first hour is recorded
    pub risk_score: Option<String>,
}

impl PatientCard {
    /// Footer text when no risk is known yet
    pub const AWAITING_DATA: &'static str = EMPTY_CHART_MESSAGE;
}

impl From<&Patient> for PatientCard {
    fn from(patient: &Patient) -> Self {
        let level = patient
            .latest_risk_level
            .as_deref()
            .filter(|l| !l.is_empty());

        Self {
            key: patient.id,
            name: patient.name.clone(),
            patient_id: patient.patient_id.clone(),
            age: describe_age(patient.age, NOT_SPECIFIED),
            gender: describe_gender(patient.gender.as_deref(), NOT_SPECIFIED),
            total_hours: patient.total_hours.unwrap_or(0),
            risk: level.map(RiskBadge::new),
            risk_score: level.map(|_| {
                format!(
                    "Risk: {:.1}%",
                    patient.latest_prediction.unwrap_or(0.0) * 100.0
                )
            }),
        }
    }
}

/// Title block of the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailHeader {
    pub name: String,
    /// "ID: P-12 | Yaş: 67 | Cinsiyet: E"
    pub meta: String,
}

impl From<&Patient> for DetailHeader {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            meta: format!(
                "ID: {} | Yaş: {} | Cinsiyet: {}",
                patient.patient_id,
                describe_age(patient.age, UNKNOWN_SHORT),
                describe_gender(patient.gender.as_deref(), UNKNOWN_SHORT),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VitalEntry {
    pub name: String,
    pub value: String,
}

/// One recorded hour in the history list
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyCard {
    pub hour: u32,
    pub title: String,
    pub risk: RiskBadge,
    pub vitals: Vec<VitalEntry>,
    /// Prediction as a percentage with two decimals, e.g. "23.00%"
    pub risk_score: String,
}

impl From<&HourlyMeasurement> for HourlyCard {
    fn from(m: &HourlyMeasurement) -> Self {
        Self {
            hour: m.hour,
            title: format!("Saat {}", m.hour),
            risk: RiskBadge::new(&m.risk_level),
            vitals: m
                .vital_signs
                .iter()
                .map(|(name, value)| VitalEntry {
                    name: name.clone(),
                    value: value.map_or_else(|| MISSING_VALUE.to_string(), |v| v.to_string()),
                })
                .collect(),
            risk_score: format!("{:.2}%", m.prediction * 100.0),
        }
    }
}

pub fn patient_cards(patients: &[Patient]) -> Vec<PatientCard> {
    patients.iter().map(PatientCard::from).collect()
}

pub fn hourly_cards(history: &[HourlyMeasurement]) -> Vec<HourlyCard> {
    history.iter().map(HourlyCard::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VitalSigns;

    fn patient() -> Patient {
        Patient {
            id: 7,
            patient_id: "P-007".to_string(),
            name: "Ayşe Yılmaz".to_string(),
            age: None,
            gender: None,
            admission_time: None,
            created_at: None,
            total_hours: None,
            latest_prediction: None,
            latest_risk_level: None,
        }
    }

    #[test]
    fn test_risk_class_replaces_first_space_only() {
        assert_eq!(risk_class("Orta Risk"), "orta-risk");
        assert_eq!(risk_class("Çok Yüksek Risk"), "çok-yüksek risk");
        assert_eq!(risk_class("Low"), "low");
    }

    #[test]
    fn test_card_without_history() {
        let card = PatientCard::from(&patient());

        assert_eq!(card.age, "Belirtilmemiş");
        assert_eq!(card.gender, "Belirtilmemiş");
        assert_eq!(card.total_hours, 0);
        assert!(card.risk.is_none());
        assert!(card.risk_score.is_none());
    }

    #[test]
    fn test_card_with_risk_uses_one_decimal() {
        let p = Patient {
            age: Some(67),
            total_hours: Some(4),
            latest_prediction: Some(0.234),
            latest_risk_level: Some("Orta Risk".to_string()),
            ..patient()
        };
        let card = PatientCard::from(&p);

        assert_eq!(card.age, "67");
        assert_eq!(card.risk_score.as_deref(), Some("Risk: 23.4%"));
        assert_eq!(card.risk.unwrap().css_class(), "risk-badge risk-orta-risk");
    }

    #[test]
    fn test_detail_header_uses_question_marks() {
        let header = DetailHeader::from(&Patient {
            gender: Some("E".to_string()),
            ..patient()
        });
        assert_eq!(header.meta, "ID: P-007 | Yaş: ? | Cinsiyet: E");
    }

    #[test]
    fn test_hourly_card() {
        let mut vitals = VitalSigns::new();
        vitals.insert("HR".to_string(), Some(92.0));
        vitals.insert("Lactate".to_string(), None);
        vitals.insert("Temp".to_string(), Some(38.4));

        let card = HourlyCard::from(&HourlyMeasurement {
            id: None,
            hour: 3,
            vital_signs: vitals,
            prediction: 0.23,
            risk_level: "Yüksek Risk".to_string(),
            timestamp: None,
        });

        assert_eq!(card.title, "Saat 3");
        assert_eq!(card.risk_score, "23.00%");
        let values: Vec<_> = card.vitals.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["92", "N/A", "38.4"]);
    }

    #[test]
    fn test_next_hour() {
        assert_eq!(next_hour(&[]), 1);

        let history = hours(&[2, 5, 3]);
        assert_eq!(next_hour(&history), 6);
    }

    #[test]
    fn test_next_hour_saturates() {
        assert_eq!(next_hour(&hours(&[7, u32::MAX])), u32::MAX);
    }

    fn hours(hours: &[u32]) -> Vec<HourlyMeasurement> {
        hours
            .iter()
            .map(|&hour| HourlyMeasurement {
                id: None,
                hour,
                vital_signs: VitalSigns::new(),
                prediction: 0.0,
                risk_level: String::new(),
                timestamp: None,
            })
            .collect()
    }
}
