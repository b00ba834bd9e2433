//! Patient bundles and profile extraction.
//!
//! Patient records are FHIR-style bundles. Only the handful of fields the
//! matcher needs are modelled; everything else in the document is ignored.

use chrono::Datelike;
use serde::Deserialize;

use ctm_model::{ConditionSet, MONTHS_PER_YEAR, PatientProfile};

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatientBundle {
    pub entry: Vec<BundleEntry>,
    /// Allergy list carried at the top level of the bundle.
    #[serde(rename = "AllergyIntolerance")]
    pub allergy_intolerance: Vec<AllergyRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BundleEntry {
    pub resource: Resource,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resource {
    pub resource_type: Option<String>,
    pub id: Option<String>,
    pub birth_date: Option<String>,
    pub code: Option<CodeableConcept>,
    pub reason_code: Vec<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Coding {
    pub system: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllergyRecord {
    pub code: Option<CodeableConcept>,
}

impl Resource {
    fn is_type(&self, resource_type: &str) -> bool {
        self.resource_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(resource_type))
    }
}

impl CodeableConcept {
    /// Display text of the first coding.
    fn first_display(&self) -> Option<&str> {
        self.coding.first().and_then(|c| non_blank(c.display.as_deref()))
    }
}

impl PatientBundle {
    /// The resource holding demographics: the first `Patient` resource, or
    /// the first entry when no resource is tagged as a patient.
    pub fn demographics(&self) -> Option<&Resource> {
        self.entry
            .iter()
            .map(|e| &e.resource)
            .find(|r| r.is_type("Patient"))
            .or_else(|| self.entry.first().map(|e| &e.resource))
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.demographics().and_then(|r| non_blank(r.id.as_deref()))
    }

    pub fn birth_date(&self) -> Option<&str> {
        self.demographics()
            .and_then(|r| non_blank(r.birth_date.as_deref()))
    }

    /// Conditions named by `Condition` codes and `Encounter` reason codes.
    pub fn conditions(&self) -> ConditionSet {
        let mut conditions = ConditionSet::new();
        for resource in self.entry.iter().map(|e| &e.resource) {
            if resource.is_type("Condition")
                && let Some(display) = resource.code.as_ref().and_then(CodeableConcept::first_display)
            {
                conditions.insert(display);
            }
            if resource.is_type("Encounter") {
                for reason in &resource.reason_code {
                    if let Some(display) = reason.first_display() {
                        conditions.insert(display);
                    }
                }
            }
        }
        conditions
    }

    /// Allergies from the top-level list and from `AllergyIntolerance`
    /// resources inside the bundle.
    pub fn allergies(&self) -> ConditionSet {
        let mut allergies = ConditionSet::new();
        for record in &self.allergy_intolerance {
            if let Some(text) = record.code.as_ref().and_then(|c| non_blank(c.text.as_deref())) {
                allergies.insert(text);
            }
        }
        for resource in self.entry.iter().map(|e| &e.resource) {
            if !resource.is_type("AllergyIntolerance") {
                continue;
            }
            let Some(code) = resource.code.as_ref() else {
                continue;
            };
            if let Some(text) = non_blank(code.text.as_deref()).or_else(|| code.first_display()) {
                allergies.insert(text);
            }
        }
        allergies
    }
}

/// Current calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Age in months from an ISO birth date, using only the calendar year.
///
/// Month and day are ignored, so the result can be off by up to eleven
/// months near a birthday. `"2000-01-01"` against 2024 gives 288.
pub fn patient_age_months(record: &str, birth_date: &str, reference_year: i32) -> Result<u32> {
    let invalid = || IngestError::InvalidBirthDate {
        record: record.to_string(),
        value: birth_date.to_string(),
    };
    let year_part = birth_date.trim().split('-').next().unwrap_or_default();
    let birth_year: i32 = year_part.parse().map_err(|_| invalid())?;
    let years = reference_year
        .checked_sub(birth_year)
        .ok_or_else(invalid)?;
    if years < 0 {
        return Err(IngestError::BirthAfterReference {
            record: record.to_string(),
            birth_year,
            reference_year,
        });
    }
    u32::try_from(years)
        .ok()
        .and_then(|y| y.checked_mul(MONTHS_PER_YEAR))
        .ok_or_else(invalid)
}

/// Builds the matcher's view of a patient bundle.
///
/// `record` names the source (usually the file path) for error messages.
pub fn build_patient_profile(
    bundle: &PatientBundle,
    record: &str,
    reference_year: i32,
) -> Result<PatientProfile> {
    let patient_id = bundle.patient_id().ok_or_else(|| IngestError::MissingField {
        record: record.to_string(),
        field: "id",
    })?;
    let birth_date = bundle.birth_date().ok_or_else(|| IngestError::MissingField {
        record: patient_id.to_string(),
        field: "birthDate",
    })?;
    let age_months = patient_age_months(patient_id, birth_date, reference_year)?;
    let profile = PatientProfile::new(patient_id, age_months)?
        .with_conditions(bundle.conditions())
        .with_allergies(bundle.allergies());
    Ok(profile)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
