//! Validation Table
//!
//! Static mapping from clinical field name to its accepted range, unit and
//! display name. Loaded once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Accepted range for one clinical field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub unit: String,
    pub display_name: String,
}

impl ValidationRule {
    pub fn new(min: f64, max: f64, unit: &str, display_name: &str) -> Self {
        Self {
            min,
            max,
            unit: unit.to_string(),
            display_name: display_name.to_string(),
        }
    }

    /// Inclusive bounds check
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Field name -> rule lookup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationTable {
    fields: BTreeMap<String, ValidationRule>,
}

/// (field, min, max, unit, display name)
const BUILTIN_RULES: &[(&str, f64, f64, &str, &str)] = &[
    // Vital signs
    ("HR", 40.0, 200.0, "bpm", "Heart Rate"),
    ("Temp", 35.0, 42.0, "°C", "Temperature"),
    ("SBP", 60.0, 250.0, "mmHg", "Systolic BP"),
    ("DBP", 30.0, 150.0, "mmHg", "Diastolic BP"),
    ("MAP", 40.0, 180.0, "mmHg", "Mean Arterial Pressure"),
    ("Resp", 8.0, 50.0, "/min", "Respiratory Rate"),
    ("O2Sat", 70.0, 100.0, "%", "Oxygen Saturation"),
    ("EtCO2", 10.0, 80.0, "mmHg", "End-tidal CO2"),
    // Hematology
    ("WBC", 1.0, 50.0, "K/µL", "WBC"),
    ("Platelets", 20.0, 800.0, "K/µL", "Platelets"),
    ("Hgb", 5.0, 20.0, "g/dL", "Hemoglobin"),
    ("Hct", 15.0, 65.0, "%", "Hematocrit"),
    // Chemistry
    ("Creatinine", 0.3, 15.0, "mg/dL", "Creatinine"),
    ("BUN", 3.0, 150.0, "mg/dL", "BUN"),
    ("Glucose", 30.0, 600.0, "mg/dL", "Glucose"),
    ("Lactate", 0.5, 20.0, "mmol/L", "Lactate"),
    ("Bilirubin_total", 0.1, 30.0, "mg/dL", "Total Bilirubin"),
    ("Bilirubin_direct", 0.0, 15.0, "mg/dL", "Direct Bilirubin"),
    // Arterial blood gas
    ("pH", 6.8, 7.8, "", "pH"),
    ("PaCO2", 15.0, 100.0, "mmHg", "PaCO2"),
    ("PaO2", 40.0, 500.0, "mmHg", "PaO2"),
    ("HCO3", 10.0, 45.0, "mEq/L", "Bicarbonate"),
    ("BaseExcess", -20.0, 20.0, "mEq/L", "Base Excess"),
    // Electrolytes
    ("Calcium", 5.0, 15.0, "mg/dL", "Calcium"),
    ("Chloride", 70.0, 130.0, "mEq/L", "Chloride"),
    ("Potassium", 2.0, 8.0, "mEq/L", "Potassium"),
    ("Magnesium", 0.5, 5.0, "mg/dL", "Magnesium"),
    // Liver
    ("AST", 5.0, 5000.0, "U/L", "AST"),
    ("ALT", 5.0, 5000.0, "U/L", "ALT"),
    ("ALP", 20.0, 1000.0, "U/L", "Alkaline Phosphatase"),
    // Sepsis markers
    ("PCT", 0.01, 100.0, "ng/mL", "Procalcitonin"),
    ("CRP", 0.0, 500.0, "mg/L", "C-Reactive Protein"),
    ("Presepsin", 100.0, 5000.0, "pg/mL", "Presepsin"),
    ("IL6", 0.0, 1000.0, "pg/mL", "Interleukin-6"),
    ("IL1b", 0.0, 200.0, "pg/mL", "Interleukin-1β"),
    // Hematology extended
    ("ESR", 0.0, 150.0, "mm/h", "ESR"),
    ("MDW", 15.0, 40.0, "", "Monocyte Distribution Width"),
    ("MPV", 5.0, 15.0, "fL", "Mean Platelet Volume"),
    ("RDW", 10.0, 25.0, "%", "RDW"),
    ("Neutrophils", 0.5, 40.0, "K/µL", "Neutrophils"),
    ("Lymphocytes", 0.2, 10.0, "K/µL", "Lymphocytes"),
    // Coagulation extended
    ("DDimer", 0.0, 20.0, "mg/L", "D-Dimer"),
    ("PT", 8.0, 50.0, "s", "Prothrombin Time"),
    ("aPTT", 15.0, 100.0, "s", "aPTT"),
    ("INR", 0.5, 10.0, "", "INR"),
    // Chemistry extended
    ("IonizedCalcium", 0.8, 1.5, "mmol/L", "Ionized Calcium"),
    ("Phosphorus", 1.0, 10.0, "mg/dL", "Phosphorus"),
    ("Albumin", 1.5, 6.0, "g/dL", "Albumin"),
    ("Sodium", 110.0, 170.0, "mEq/L", "Sodium"),
    // Derived ratios
    ("NLR", 0.1, 100.0, "", "Neutrophil/Lymphocyte Ratio"),
    ("PLR", 10.0, 1000.0, "", "Platelet/Lymphocyte Ratio"),
    ("AnionGap", 0.0, 40.0, "mEq/L", "Anion Gap"),
    ("Urine_output", 0.0, 500.0, "mL/h", "Urine Output"),
];

impl ValidationTable {
    /// Empty table: every field is accepted
    pub fn new() -> Self {
        Self::default()
    }

    /// The default table shipped with the dashboard
    pub fn builtin() -> Self {
        let fields = BUILTIN_RULES
            .iter()
            .map(|&(field, min, max, unit, display)| {
                (field.to_string(), ValidationRule::new(min, max, unit, display))
            })
            .collect();

        Self { fields }
    }

    /// Build a table from explicit rules, rejecting inconsistent bounds
    pub fn from_rules<I>(rules: I) -> Result<Self, ValidationTableError>
    where
        I: IntoIterator<Item = (String, ValidationRule)>,
    {
        let mut fields = BTreeMap::new();
        for (field, rule) in rules {
            check_rule(&field, &rule)?;
            fields.insert(field, rule);
        }
        Ok(Self { fields })
    }

    /// Parse a table from TOML (`[fields.HR]` sections)
    #[cfg(feature = "native")]
    pub fn from_toml_str(content: &str) -> Result<Self, ValidationTableError> {
        #[derive(Deserialize)]
        struct TableFile {
            #[serde(default)]
            fields: BTreeMap<String, ValidationRule>,
        }

        let file: TableFile =
            toml::from_str(content).map_err(|e| ValidationTableError::Parse(e.to_string()))?;

        Self::from_rules(file.fields)
    }

    /// Load a table from a TOML file
    #[cfg(feature = "native")]
    pub fn load(path: &std::path::Path) -> Result<Self, ValidationTableError> {
        let content = std::fs::read_to_string(path).map_err(|e| ValidationTableError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let table = Self::from_toml_str(&content)?;
        tracing::info!("Loaded {} validation rules from {:?}", table.len(), path);
        Ok(table)
    }

    pub fn get(&self, field: &str) -> Option<&ValidationRule> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationRule)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn check_rule(field: &str, rule: &ValidationRule) -> Result<(), ValidationTableError> {
    if !rule.min.is_finite() || !rule.max.is_finite() || rule.min > rule.max {
        return Err(ValidationTableError::InvalidBounds {
            field: field.to_string(),
            min: rule.min,
            max: rule.max,
        });
    }
    Ok(())
}

/// Errors while loading a validation table
#[derive(Debug, Error)]
pub enum ValidationTableError {
    #[error("Failed to read validation table {path:?}: {error}")]
    Io {
        path: std::path::PathBuf,
        error: String,
    },

    #[error("Failed to parse validation table: {0}")]
    Parse(String),

    #[error("Invalid bounds for {field}: min={min}, max={max}")]
    InvalidBounds { field: String, min: f64, max: f64 },
}
