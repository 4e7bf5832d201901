//! View Controller and application state
//!
//! - **State**: the single [`AppState`] object (user, patients, selection,
//!   active view, collapsed sections, chart handle, request epochs)
//! - **Controller**: list/detail switching and patient operations
//! - **Models**: display-ready cards and headers
//! - **Notify**: transient notifications
//!
//! Exactly one of the list and detail views is active at any time; the
//! initial view is the list.

mod controller;
mod epoch;
mod models;
mod notify;
mod state;

pub use controller::ViewController;
pub use epoch::{RequestEpoch, RequestToken};
pub use models::{
    hourly_cards, next_hour, patient_cards, risk_class, DetailHeader, HourlyCard, PatientCard,
    RiskBadge, VitalEntry, MISSING_VALUE, NOT_SPECIFIED, NO_HOURLY_DATA, NO_PATIENTS,
    UNKNOWN_SHORT,
};
pub use notify::{
    Notification, NotificationLevel, CONNECTION_ERROR, DETAIL_LOAD_FAILED, PATIENTS_LOAD_FAILED,
    PATIENT_ADDED, PATIENT_DELETED, TOAST_DURATION_MS,
};
pub use state::{ActiveView, AppState};
