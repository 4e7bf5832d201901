//! CSV Import
//!
//! Turns a CSV of hourly biomarker values into hourly submissions. The header
//! names the hour column and one column per biomarker; empty cells are sent as
//! null (field intentionally omitted).

use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::api::{HourlySubmission, VitalSigns};
use crate::validation::{check_vital_signs, form_fields, ValidationTable};

const MAX_REPORTED_ERRORS: usize = 100;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing hour column '{0}'")]
    MissingHourColumn(String),
}

/// CSV importer with a configurable hour column
pub struct HourlyCsvImporter {
    hour_column: String,
    delimiter: u8,
    fill_form_fields: bool,
}

/// Result of an import
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub submissions: Vec<HourlySubmission>,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl ImportOutcome {
    /// Validation messages per submitted hour, only for hours with problems
    pub fn check(&self, table: &ValidationTable) -> Vec<(u32, Vec<String>)> {
        self.submissions
            .iter()
            .filter_map(|s| {
                let problems = check_vital_signs(table, &s.vital_signs);
                (!problems.is_empty()).then_some((s.hour, problems))
            })
            .collect()
    }
}

impl Default for HourlyCsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HourlyCsvImporter {
    pub fn new() -> Self {
        Self {
            hour_column: "hour".to_string(),
            delimiter: b',',
            fill_form_fields: false,
        }
    }

    pub fn with_hour_column(mut self, column: &str) -> Self {
        self.hour_column = column.to_string();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Send every form field, null when the CSV has no column for it
    pub fn with_form_fields(mut self, fill: bool) -> Self {
        self.fill_form_fields = fill;
        self
    }

    pub fn import(&self, path: &Path) -> Result<ImportOutcome, ImportError> {
        let file = std::fs::File::open(path)?;
        self.import_reader(file)
    }

    pub fn import_str(&self, csv_data: &str) -> Result<ImportOutcome, ImportError> {
        self.import_reader(csv_data.as_bytes())
    }

    fn import_reader<R: Read>(&self, input: R) -> Result<ImportOutcome, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let hour_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(&self.hour_column))
            .ok_or_else(|| ImportError::MissingHourColumn(self.hour_column.clone()))?;
        let columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, name)| *idx != hour_idx && !name.is_empty())
            .map(|(idx, name)| (idx, name.to_string()))
            .collect();

        let mut outcome = ImportOutcome::default();

        for (line_num, result) in reader.records().enumerate() {
            let line = line_num + 2;

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    outcome.errors.push(format!("Line {}: {}", line, e));
                    outcome.rows_failed += 1;
                    continue;
                }
            };

            match self.parse_row(&record, hour_idx, &columns) {
                Ok(submission) => outcome.submissions.push(submission),
                Err(message) => {
                    outcome.errors.push(format!("Line {}: {}", line, message));
                    outcome.rows_failed += 1;
                }
            }
        }

        if outcome.errors.len() > MAX_REPORTED_ERRORS {
            let total = outcome.errors.len();
            outcome.errors.truncate(MAX_REPORTED_ERRORS);
            outcome
                .errors
                .push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
        }

        tracing::debug!(
            rows = outcome.submissions.len(),
            failed = outcome.rows_failed,
            "Parsed hourly CSV"
        );
        Ok(outcome)
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        hour_idx: usize,
        columns: &[(usize, String)],
    ) -> Result<HourlySubmission, String> {
        let hour_raw = record.get(hour_idx).unwrap_or("");
        let hour = match hour_raw.parse::<u32>() {
            Ok(h) if h > 0 => h,
            _ => return Err(format!("invalid hour '{}'", hour_raw)),
        };

        let mut vital_signs = VitalSigns::new();
        if self.fill_form_fields {
            for field in form_fields() {
                vital_signs.insert(field.to_string(), None);
            }
        }

        for (idx, name) in columns {
            let raw = record.get(*idx).unwrap_or("");
            let value = if raw.is_empty() {
                None
            } else {
                match raw.parse::<f64>() {
                    Ok(v) if v.is_finite() => Some(v),
                    _ => return Err(format!("{} is not a number: '{}'", name, raw)),
                }
            };
            vital_signs.insert(name.clone(), value);
        }

        Ok(HourlySubmission { hour, vital_signs })
    }
}
