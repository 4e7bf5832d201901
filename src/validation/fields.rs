//! Biomarker form layout: collapsible sections and the fields they hold.

/// A collapsible group of inputs on the hourly data form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSection {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: &'static [&'static str],
    /// Added with the extended biomarker panel
    pub extended: bool,
}

pub const FORM_SECTIONS: &[FieldSection] = &[
    FieldSection {
        id: "vital-signs",
        title: "Vital Signs",
        fields: &["HR", "O2Sat", "Temp", "Resp"],
        extended: false,
    },
    FieldSection {
        id: "blood-pressure",
        title: "Blood Pressure",
        fields: &["SBP", "DBP", "MAP"],
        extended: false,
    },
    FieldSection {
        id: "respiratory",
        title: "Respiratory",
        fields: &["EtCO2", "FiO2", "PaCO2", "SaO2"],
        extended: false,
    },
    FieldSection {
        id: "acid-base",
        title: "Acid-Base",
        fields: &["pH", "BaseExcess", "HCO3"],
        extended: false,
    },
    FieldSection {
        id: "liver-kidney",
        title: "Liver & Kidney",
        fields: &[
            "BUN",
            "Creatinine",
            "AST",
            "Alkalinephos",
            "Bilirubin_total",
            "Bilirubin_direct",
        ],
        extended: false,
    },
    FieldSection {
        id: "electrolytes",
        title: "Electrolytes & Metabolites",
        fields: &[
            "Calcium",
            "Chloride",
            "Potassium",
            "Magnesium",
            "Phosphate",
            "Glucose",
            "Lactate",
        ],
        extended: false,
    },
    FieldSection {
        id: "hematology",
        title: "Hematology",
        fields: &["WBC", "Hct", "Hgb", "Platelets"],
        extended: false,
    },
    FieldSection {
        id: "coagulation-cardiac",
        title: "Coagulation & Cardiac",
        fields: &["PTT", "Fibrinogen", "TroponinI"],
        extended: false,
    },
    FieldSection {
        id: "sepsis-markers",
        title: "Sepsis Markers",
        fields: &["PCT", "CRP", "Presepsin", "IL6", "IL1b"],
        extended: true,
    },
    FieldSection {
        id: "hematology-extended",
        title: "Hematology (Extended)",
        fields: &["ESR", "MDW", "MPV", "RDW", "Neutrophils", "Lymphocytes"],
        extended: true,
    },
    FieldSection {
        id: "coagulation-extended",
        title: "Coagulation (Extended)",
        fields: &["DDimer", "PT", "aPTT", "INR"],
        extended: true,
    },
    FieldSection {
        id: "chemistry-extended",
        title: "Chemistry (Extended)",
        fields: &["IonizedCalcium", "Phosphorus", "Albumin", "Sodium"],
        extended: true,
    },
];

/// Every form field in display order
pub fn form_fields() -> impl Iterator<Item = &'static str> {
    FORM_SECTIONS.iter().flat_map(|s| s.fields.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fields_are_unique() {
        let all: Vec<_> = form_fields().collect();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn test_section_ids_are_unique() {
        let ids: HashSet<_> = FORM_SECTIONS.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), FORM_SECTIONS.len());
    }

    #[test]
    fn test_base_panel_has_34_parameters() {
        let base: usize = FORM_SECTIONS
            .iter()
            .filter(|s| !s.extended)
            .map(|s| s.fields.len())
            .sum();
        assert_eq!(base, 34);
    }
}
