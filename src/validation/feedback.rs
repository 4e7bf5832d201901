//! Field Feedback
//!
//! Handler-side state for inline validation: which fields currently show an
//! error message and how each input should be styled. Keeps at most one
//! message per field no matter how often a field is re-validated.

use std::collections::BTreeMap;

use super::table::ValidationTable;
use super::validator::{validate, FieldCheck};

/// Visual marker for an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMark {
    /// Untouched or intentionally left blank
    #[default]
    Neutral,
    Valid,
    Invalid,
}

impl FieldMark {
    /// CSS class applied to the input element
    pub fn css_class(&self) -> &'static str {
        match self {
            FieldMark::Neutral => "",
            FieldMark::Valid => "input-valid",
            FieldMark::Invalid => "input-invalid",
        }
    }
}

/// Per-form validation feedback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldFeedback {
    marks: BTreeMap<String, FieldMark>,
    errors: BTreeMap<String, String>,
}

impl FieldFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-validate a field after it loses focus.
    ///
    /// Blank input means the field is omitted on purpose and is always valid.
    pub fn on_blur(&mut self, table: &ValidationTable, field: &str, raw: &str) -> FieldMark {
        self.clear(field);

        if raw.trim().is_empty() {
            return FieldMark::Neutral;
        }

        let mark = match validate(table, field, raw) {
            FieldCheck::Valid => FieldMark::Valid,
            FieldCheck::Invalid { message } => {
                self.errors.insert(field.to_string(), message);
                FieldMark::Invalid
            }
        };
        self.marks.insert(field.to_string(), mark);
        mark
    }

    /// Drop any message when the user starts editing the field again
    pub fn on_focus(&mut self, field: &str) {
        self.clear(field);
    }

    /// Remove the message and styling for a field
    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
        self.marks.remove(field);
    }

    /// Forget everything, e.g. after the form is reset
    pub fn reset(&mut self) {
        self.errors.clear();
        self.marks.clear();
    }

    pub fn mark(&self, field: &str) -> FieldMark {
        self.marks.get(field).copied().unwrap_or_default()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All visible messages, in field order
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
