//! # Sepsis Dashboard
//!
//! Client side of a hospital sepsis-risk monitoring dashboard: login and
//! session handling, patient list/detail views, the hourly biomarker form with
//! client-side range checks, and the risk trend chart. Risk prediction,
//! persistence and authentication belong to the backend.
//!
//! ## Modules
//!
//! - [`validation`]: Range table, field validator and inline form feedback
//! - [`session`]: Session cookie, user display cache, login/logout
//! - [`api`]: Typed backend client (`DashboardApi`, reqwest implementation)
//! - [`view`]: Application state and the list/detail view controller
//! - [`chart`]: Risk trend chart model and renderer
//! - [`config`]: TOML configuration with environment overrides (native)
//! - [`import`]: Hourly measurements from CSV (native)
//!
//! Without the default `native` feature only the browser-safe core is built;
//! the `sepsis-ui` crate uses it that way.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sepsis_dashboard::api::{PatientClient, PatientClientConfig};
//! use sepsis_dashboard::chart::SvgSurface;
//! use sepsis_dashboard::view::ViewController;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PatientClient::new(PatientClientConfig::default())?.with_session("token");
//!     let controller = ViewController::new(client, SvgSurface::default());
//!
//!     if controller.check_auth().await {
//!         controller.load_patients().await;
//!         for card in controller.state().patient_cards() {
//!             println!("{} ({})", card.name, card.patient_id);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod session;
pub mod validation;
pub mod view;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod import;

#[cfg(test)]
pub(crate) mod testing;

// Re-export top-level types for convenience
pub use api::{ClientError, ClientResult, DashboardApi};
pub use chart::{ChartRenderer, ChartSpec, ChartSurface};
pub use session::{SessionManager, SessionProbe};
pub use validation::{validate, FieldCheck, FieldFeedback, ValidationRule, ValidationTable};
pub use view::{ActiveView, AppState, Notification, ViewController};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
#[cfg(feature = "native")]
pub use import::{HourlyCsvImporter, ImportError};
