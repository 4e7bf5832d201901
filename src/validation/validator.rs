//! Field Validator
//!
//! Pure range check of a single raw input against the validation table.

use std::collections::BTreeMap;

use super::table::{ValidationRule, ValidationTable};

/// Outcome of validating one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCheck {
    Valid,
    Invalid { message: String },
}

impl FieldCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldCheck::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FieldCheck::Valid => None,
            FieldCheck::Invalid { message } => Some(message),
        }
    }
}

/// Validate a raw input for `field`.
///
/// Fields missing from the table are always valid. Callers skip blank input
/// before getting here; a blank value that does reach this function is
/// reported as not a number.
pub fn validate(table: &ValidationTable, field: &str, raw: &str) -> FieldCheck {
    let Some(rule) = table.get(field) else {
        return FieldCheck::Valid;
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => validate_value(rule, value),
        _ => FieldCheck::Invalid {
            message: format!("{} must be a number", rule.display_name),
        },
    }
}

/// Validate an already-parsed value against a rule
pub fn validate_value(rule: &ValidationRule, value: f64) -> FieldCheck {
    if rule.contains(value) {
        FieldCheck::Valid
    } else {
        FieldCheck::Invalid {
            message: range_message(rule),
        }
    }
}

fn range_message(rule: &ValidationRule) -> String {
    let message = format!(
        "{} must be between {} and {} {}",
        rule.display_name, rule.min, rule.max, rule.unit
    );
    message.trim_end().to_string()
}

/// Check a full vital-signs map, returning one message per offending field.
///
/// Null entries are intentionally omitted fields and never reported.
pub fn check_vital_signs(
    table: &ValidationTable,
    vital_signs: &BTreeMap<String, Option<f64>>,
) -> Vec<String> {
    vital_signs
        .iter()
        .filter_map(|(field, value)| {
            let value = (*value)?;
            let rule = table.get(field)?;
            if !value.is_finite() {
                return Some(format!("{} must be a number", rule.display_name));
            }
            validate_value(rule, value).message().map(str::to_string)
        })
        .collect()
}
