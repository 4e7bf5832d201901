//! Application State
//!
//! Everything the dashboard mutates lives in one [`AppState`] owned by the
//! view controller.

use std::collections::BTreeSet;

use super::epoch::RequestEpoch;
use super::models::{hourly_cards, next_hour, patient_cards, DetailHeader, HourlyCard, PatientCard};
use super::notify::Notification;
use crate::api::{Patient, PatientDetail, PatientKey, User};
use crate::chart::ChartHandle;
use crate::validation::{FieldFeedback, FORM_SECTIONS};

/// The two mutually exclusive panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    List,
    Detail,
}

impl ActiveView {
    /// Class for a panel element: `"active"` on the visible one
    pub fn class_for(&self, panel: ActiveView) -> &'static str {
        if *self == panel {
            "active"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub current_user: Option<User>,
    pub patients: Vec<Patient>,
    pub selected: Option<PatientKey>,
    pub detail: Option<PatientDetail>,
    pub view: ActiveView,
    pub collapsed: BTreeSet<String>,
    pub chart: Option<ChartHandle>,
    pub list_epoch: RequestEpoch,
    pub detail_epoch: RequestEpoch,
    pub notifications: Vec<Notification>,
    pub next_hour: u32,
    /// Inline validation of the hourly data form
    pub feedback: FieldFeedback,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// List view, extended biomarker sections collapsed
    pub fn new() -> Self {
        Self {
            current_user: None,
            patients: Vec::new(),
            selected: None,
            detail: None,
            view: ActiveView::List,
            collapsed: FORM_SECTIONS
                .iter()
                .filter(|s| s.extended)
                .map(|s| s.id.to_string())
                .collect(),
            chart: None,
            list_epoch: RequestEpoch::new(),
            detail_epoch: RequestEpoch::new(),
            notifications: Vec::new(),
            next_hour: 1,
            feedback: FieldFeedback::new(),
        }
    }

    pub fn is_collapsed(&self, section_id: &str) -> bool {
        self.collapsed.contains(section_id)
    }

    /// Class for a section and its header
    pub fn section_class(&self, section_id: &str) -> &'static str {
        if self.is_collapsed(section_id) {
            "collapsed"
        } else {
            ""
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn patient_cards(&self) -> Vec<PatientCard> {
        patient_cards(&self.patients)
    }

    pub fn detail_header(&self) -> Option<DetailHeader> {
        self.detail.as_ref().map(|d| DetailHeader::from(&d.patient))
    }

    pub fn hourly_cards(&self) -> Vec<HourlyCard> {
        self.detail
            .as_ref()
            .map(|d| hourly_cards(&d.hourly_data))
            .unwrap_or_default()
    }

    /// Install a freshly loaded detail and derive the suggested hour
    pub(crate) fn set_detail(&mut self, detail: PatientDetail) {
        self.next_hour = next_hour(&detail.hourly_data);
        self.detail = Some(detail);
    }
}
