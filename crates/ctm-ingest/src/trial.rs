//! Trial documents in the ClinicalTrials.gov study layout.

use serde::Deserialize;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrialRecord {
    pub protocol_section: ProtocolSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtocolSection {
    pub identification_module: IdentificationModule,
    pub eligibility_module: EligibilityModule,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentificationModule {
    pub nct_id: Option<String>,
    pub brief_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EligibilityModule {
    pub eligibility_criteria: Option<String>,
    pub minimum_age: Option<String>,
    pub maximum_age: Option<String>,
}

impl TrialRecord {
    /// Trial identifier (`nctId`). Required.
    pub fn trial_id(&self, record: &str) -> Result<&str> {
        self.protocol_section
            .identification_module
            .nct_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| IngestError::MissingField {
                record: record.to_string(),
                field: "nctId",
            })
    }

    /// Display name, falling back to the trial id when the title is blank.
    pub fn trial_name<'a>(&'a self, trial_id: &'a str) -> &'a str {
        self.protocol_section
            .identification_module
            .brief_title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(trial_id)
    }

    /// Free-text eligibility criteria; empty when absent.
    pub fn eligibility_text(&self) -> &str {
        self.protocol_section
            .eligibility_module
            .eligibility_criteria
            .as_deref()
            .unwrap_or_default()
    }

    /// Explicit minimum age field, if present and non-blank.
    pub fn minimum_age(&self) -> Option<&str> {
        non_blank(self.protocol_section.eligibility_module.minimum_age.as_deref())
    }

    /// Explicit maximum age field, if present and non-blank.
    pub fn maximum_age(&self) -> Option<&str> {
        non_blank(self.protocol_section.eligibility_module.maximum_age.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_study_fields() {
        let record: TrialRecord = serde_json::from_str(
            r#"{"protocolSection": {
                "identificationModule": {"nctId": "NCT00001159", "briefTitle": "Thyroid Study"},
                "eligibilityModule": {
                    "eligibilityCriteria": "INCLUSION CRITERIA: hypothyroidism",
                    "minimumAge": "18 Years",
                    "maximumAge": " "
                }
            }}"#,
        )
        .unwrap();
        let id = record.trial_id("t.json").unwrap();
        assert_eq!(id, "NCT00001159");
        assert_eq!(record.trial_name(id), "Thyroid Study");
        assert_eq!(record.minimum_age(), Some("18 Years"));
        assert_eq!(record.maximum_age(), None);
        assert!(record.eligibility_text().starts_with("INCLUSION"));
    }

    #[test]
    fn missing_id_is_reported() {
        let record = TrialRecord::default();
        assert!(matches!(
            record.trial_id("t.json"),
            Err(IngestError::MissingField { field: "nctId", .. })
        ));
        assert_eq!(record.eligibility_text(), "");
    }

    #[test]
    fn blank_title_falls_back_to_id() {
        let record: TrialRecord = serde_json::from_str(
            r#"{"protocolSection": {"identificationModule": {"nctId": "NCT9", "briefTitle": ""}}}"#,
        )
        .unwrap();
        assert_eq!(record.trial_name("NCT9"), "NCT9");
    }
}
