//! View Controller
//!
//! Drives the dashboard: list/detail switching, patient mutations and the
//! hourly data form. Every backend call is a single request; after a
//! mutation the affected view is re-fetched rather than patched locally.
//!
//! State lives in an `Rc<RefCell<AppState>>`. Borrows are never held across
//! an `.await`, so overlapping handlers on the same event loop interleave
//! safely. Responses are applied only while their request token is current.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::notify::{
    Notification, CONNECTION_ERROR, DETAIL_LOAD_FAILED, PATIENTS_LOAD_FAILED, PATIENT_ADDED,
    PATIENT_DELETED,
};
use super::state::{ActiveView, AppState};
use crate::api::{ClientError, DashboardApi, HourlySubmission, NewPatient, PatientKey, VitalSigns};
use crate::chart::{ChartRenderer, ChartSurface};
use crate::session::{self, CookieStore, SessionManager, StoreError, UserCache};
use crate::validation::{FieldMark, ValidationTable, FORM_SECTIONS};

pub struct ViewController<A, S> {
    api: A,
    state: Rc<RefCell<AppState>>,
    renderer: RefCell<ChartRenderer<S>>,
    table: ValidationTable,
}

/// Map a failed call to the notification shown for it
fn failure(error: &ClientError, fallback: &str) -> Notification {
    match error {
        ClientError::Backend { .. } => Notification::error(fallback),
        other => {
            tracing::error!("Request failed: {}", other);
            Notification::error(CONNECTION_ERROR)
        }
    }
}

/// Backend message verbatim, or the connection error
fn verbatim(error: &ClientError) -> Notification {
    match error {
        ClientError::Backend {
            message, details, ..
        } => {
            if !details.is_empty() {
                tracing::warn!(?details, "Backend rejected request: {}", message);
            }
            Notification::error(message.clone())
        }
        other => {
            tracing::error!("Request failed: {}", other);
            Notification::error(CONNECTION_ERROR)
        }
    }
}

impl<A: DashboardApi, S: ChartSurface> ViewController<A, S> {
    pub fn new(api: A, surface: S) -> Self {
        Self::with_table(api, surface, ValidationTable::builtin())
    }

    pub fn with_table(api: A, surface: S, table: ValidationTable) -> Self {
        Self {
            api,
            state: Rc::new(RefCell::new(AppState::new())),
            renderer: RefCell::new(ChartRenderer::new(surface)),
            table,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn table(&self) -> &ValidationTable {
        &self.table
    }

    /// Shared handle on the application state
    pub fn shared_state(&self) -> Rc<RefCell<AppState>> {
        self.state.clone()
    }

    /// Borrow the state for reading; drop before awaiting anything
    pub fn state(&self) -> Ref<'_, AppState> {
        self.state.borrow()
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.borrow_mut().notifications)
    }

    /// Run `f` against the chart surface (e.g. to export what was drawn)
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(self.renderer.borrow().surface())
    }

    /// Confirm the session; `false` means the caller should go to the login page
    pub async fn check_auth(&self) -> bool {
        let result = self.api.current_user().await;
        let mut state = self.state.borrow_mut();

        match result {
            Ok(user) => {
                tracing::debug!(username = %user.username, "Authenticated");
                state.current_user = Some(user);
                true
            }
            Err(e) => {
                tracing::info!("Not authenticated: {}", e);
                state.current_user = None;
                false
            }
        }
    }

    /// Refresh the patient list
    pub async fn load_patients(&self) {
        let token = self.state.borrow_mut().list_epoch.begin();
        let result = self.api.list_patients().await;
        let mut state = self.state.borrow_mut();

        if !state.list_epoch.is_current(token) {
            tracing::debug!("Discarding stale patient list");
            return;
        }

        match result {
            Ok(patients) => {
                tracing::debug!(count = patients.len(), "Loaded patients");
                state.patients = patients;
            }
            Err(e) => state.notify(failure(&e, PATIENTS_LOAD_FAILED)),
        }
    }

    /// Load a patient and switch to the detail view.
    ///
    /// On failure the current view stays as it was. Returns whether the
    /// detail was applied.
    pub async fn show_detail(&self, id: PatientKey) -> bool {
        let token = self.state.borrow_mut().detail_epoch.begin();

        let result = self.api.get_patient(id).await;
        let mut state = self.state.borrow_mut();

        if !state.detail_epoch.is_current(token) {
            tracing::debug!(patient = id, "Discarding stale patient detail");
            return false;
        }

        match result {
            Ok(detail) => {
                let state = &mut *state;
                self.renderer
                    .borrow_mut()
                    .render(&mut state.chart, &detail.hourly_data);
                state.set_detail(detail);
                state.selected = Some(id);
                state.view = ActiveView::Detail;
                tracing::info!(patient = id, "Showing patient detail");
                true
            }
            Err(e) => {
                state.notify(failure(&e, DETAIL_LOAD_FAILED));
                false
            }
        }
    }

    /// Back to the list: clears the selection and refreshes the list
    pub async fn show_list(&self) {
        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            state.view = ActiveView::List;
            state.selected = None;
            state.detail = None;
            state.detail_epoch.invalidate();
            state.feedback.reset();
            self.renderer.borrow_mut().clear(&mut state.chart);
        }
        self.load_patients().await;
    }

    /// Collapse or expand a form section; returns whether it is now collapsed
    pub fn toggle_section(&self, section_id: &str) -> bool {
        if !FORM_SECTIONS.iter().any(|s| s.id == section_id) {
            return false;
        }

        let mut state = self.state.borrow_mut();
        if state.collapsed.remove(section_id) {
            false
        } else {
            state.collapsed.insert(section_id.to_string());
            true
        }
    }

    /// Inline validation when an input loses focus
    pub fn blur_field(&self, field: &str, raw: &str) -> FieldMark {
        self.state
            .borrow_mut()
            .feedback
            .on_blur(&self.table, field, raw)
    }

    pub fn focus_field(&self, field: &str) {
        self.state.borrow_mut().feedback.on_focus(field);
    }

    /// Create a patient; returns whether it was accepted
    pub async fn add_patient(&self, patient: &NewPatient) -> bool {
        match self.api.create_patient(patient).await {
            Ok(created) => {
                tracing::info!(key = created.patient_id, "Patient created");
                self.state
                    .borrow_mut()
                    .notify(Notification::success(PATIENT_ADDED));
                self.load_patients().await;
                true
            }
            Err(e) => {
                self.state.borrow_mut().notify(verbatim(&e));
                false
            }
        }
    }

    /// Submit one hour for the selected patient, then re-fetch its detail
    pub async fn submit_hourly(&self, hour: u32, vital_signs: VitalSigns) -> bool {
        let Some(id) = self.state.borrow().selected else {
            return false;
        };

        let submission = HourlySubmission { hour, vital_signs };
        match self.api.submit_hourly(id, &submission).await {
            Ok(result) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.notify(Notification::success(format!(
                        "Saat {} kaydedildi! Risk: {:.2}%",
                        hour,
                        result.prediction * 100.0
                    )));
                    state.feedback.reset();
                }
                self.show_detail(id).await;
                true
            }
            Err(e) => {
                self.state.borrow_mut().notify(verbatim(&e));
                false
            }
        }
    }

    /// Delete the selected patient once the user has confirmed
    pub async fn delete_current_patient(&self, confirmed: bool) -> bool {
        let Some(id) = self.state.borrow().selected else {
            return false;
        };
        if !confirmed {
            return false;
        }

        match self.api.delete_patient(id).await {
            Ok(()) => {
                tracing::info!(patient = id, "Patient deleted");
                self.state
                    .borrow_mut()
                    .notify(Notification::success(PATIENT_DELETED));
                self.show_list().await;
                true
            }
            Err(e) => {
                self.state.borrow_mut().notify(verbatim(&e));
                false
            }
        }
    }

    /// End the session and reset everything but the chart surface
    pub async fn logout<C, U>(
        &self,
        sessions: &mut SessionManager<C>,
        cache: &mut U,
    ) -> Result<(), StoreError>
    where
        C: CookieStore,
        U: UserCache,
    {
        session::logout(&self.api, sessions, cache).await?;

        let mut state = self.state.borrow_mut();
        self.renderer.borrow_mut().clear(&mut state.chart);
        *state = AppState::new();
        Ok(())
    }
}
