//! Record ingestion for the trial matcher.
//!
//! This crate is the record store: it discovers JSON documents in a folder,
//! parses patient bundles and trial documents, and derives the structured
//! [`PatientProfile`](ctm_model::PatientProfile) used for matching.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ctm_ingest::{current_year, load_patient_profiles, load_trial_records};
//!
//! let (patients, issues) = load_patient_profiles(Path::new("data/patients"), current_year())?;
//! let trials = load_trial_records(Path::new("data/trials"))?;
//! ```

mod discovery;
mod error;
mod loader;
mod patient;
mod trial;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::list_json_files;

// === Loading ===
pub use loader::{
    LoadedRecords, SourcedRecord, load_patient_profiles, load_records, load_trial_records,
    read_record,
};

// === Patient Records ===
pub use patient::{
    AllergyRecord, BundleEntry, CodeableConcept, Coding, PatientBundle, Resource,
    build_patient_profile, current_year, patient_age_months,
};

// === Trial Records ===
pub use trial::{EligibilityModule, IdentificationModule, ProtocolSection, TrialRecord};
