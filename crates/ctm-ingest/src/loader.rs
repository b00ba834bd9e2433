//! Loading record folders into memory.
//!
//! A folder that cannot be listed is fatal. A single file that cannot be
//! read or parsed is not: it becomes a `MalformedInput` issue and loading
//! continues with the next file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use ctm_model::{IssueKind, PatientProfile, RunIssue};

use crate::discovery::list_json_files;
use crate::error::{IngestError, Result};
use crate::patient::{PatientBundle, build_patient_profile};
use crate::trial::TrialRecord;

/// A parsed document and the file it came from.
#[derive(Debug, Clone)]
pub struct SourcedRecord<T> {
    pub path: PathBuf,
    pub record: T,
}

impl<T> SourcedRecord<T> {
    /// File name used to identify the record in logs and issues.
    pub fn source_name(&self) -> String {
        source_name(&self.path)
    }
}

/// Records loaded from one folder plus the files that were skipped.
#[derive(Debug, Clone)]
pub struct LoadedRecords<T> {
    pub records: Vec<SourcedRecord<T>>,
    pub issues: Vec<RunIssue>,
}

/// Reads and parses a single JSON document.
pub fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| IngestError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reads every `.json` document in `dir`, in filename order.
pub fn load_records<T: DeserializeOwned>(dir: &Path) -> Result<LoadedRecords<T>> {
    let start = Instant::now();
    let files = list_json_files(dir)?;
    let mut records = Vec::with_capacity(files.len());
    let mut issues = Vec::new();
    for path in files {
        match read_record::<T>(&path) {
            Ok(record) => {
                debug!(source_file = %path.display(), "record loaded");
                records.push(SourcedRecord { path, record });
            }
            Err(error) => {
                warn!(source_file = %path.display(), %error, "skipping unreadable record");
                issues.push(RunIssue::new(
                    IssueKind::MalformedInput,
                    source_name(&path),
                    error.to_string(),
                ));
            }
        }
    }
    info!(
        folder = %dir.display(),
        record_count = records.len(),
        skipped = issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "records loaded"
    );
    Ok(LoadedRecords { records, issues })
}

pub fn load_trial_records(dir: &Path) -> Result<LoadedRecords<TrialRecord>> {
    load_records(dir)
}

/// Loads patient bundles and turns each into a [`PatientProfile`].
///
/// Bundles missing an id or a usable birth date are skipped and reported.
pub fn load_patient_profiles(
    dir: &Path,
    reference_year: i32,
) -> Result<(Vec<PatientProfile>, Vec<RunIssue>)> {
    let LoadedRecords {
        records,
        mut issues,
    } = load_records::<PatientBundle>(dir)?;
    let mut profiles = Vec::with_capacity(records.len());
    for sourced in records {
        let name = sourced.source_name();
        match build_patient_profile(&sourced.record, &name, reference_year) {
            Ok(profile) => {
                debug!(
                    patient_id = %profile.patient_id,
                    age_months = profile.age_months,
                    condition_count = profile.conditions.len(),
                    allergy_count = profile.allergies.len(),
                    "patient profile built"
                );
                profiles.push(profile);
            }
            Err(error) => {
                warn!(source_file = %name, %error, "skipping malformed patient record");
                issues.push(RunIssue::new(
                    IssueKind::MalformedInput,
                    name,
                    error.to_string(),
                ));
            }
        }
    }
    Ok((profiles, issues))
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
