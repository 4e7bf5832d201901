//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod add_patient;
pub mod biomarker_form;
pub mod chart;
pub mod nav;
pub mod patient_card;
pub mod toast;

pub use add_patient::AddPatientModal;
pub use biomarker_form::BiomarkerForm;
pub use chart::RiskChart;
pub use nav::Nav;
pub use patient_card::PatientCardItem;
pub use toast::Toast;
