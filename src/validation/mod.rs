//! Client-side Validation
//!
//! Range checks for the biomarker data-entry form.
//!
//! - **Table**: field name -> accepted range, unit and display name
//! - **Validator**: accept/reject a single raw input
//! - **Feedback**: inline error state for the form, one message per field
//! - **Fields**: layout of the hourly data form
//!
//! Unknown fields are never blocked: anything missing from the table is valid.

mod feedback;
mod fields;
mod table;
mod validator;

pub use feedback::{FieldFeedback, FieldMark};
pub use fields::{form_fields, FieldSection, FORM_SECTIONS};
pub use table::{ValidationRule, ValidationTable, ValidationTableError};
pub use validator::{check_vital_signs, validate, validate_value, FieldCheck};
