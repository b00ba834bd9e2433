//! Integration tests for folder loading.

use std::path::Path;

use tempfile::TempDir;

use ctm_ingest::{IngestError, load_patient_profiles, load_trial_records};
use ctm_model::IssueKind;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn malformed_patients_are_skipped_and_reported() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a.json",
        r#"{"entry": [{"resource": {"resourceType": "Patient", "id": "p-a", "birthDate": "2000-01-01"}}]}"#,
    );
    write(
        dir.path(),
        "b.json",
        r#"{"entry": [{"resource": {"resourceType": "Patient", "id": "p-b"}}]}"#,
    );
    write(dir.path(), "c.json", "{ not json");
    write(
        dir.path(),
        "d.json",
        r#"{"entry": [{"resource": {"resourceType": "Patient", "id": "p-d", "birthDate": "1950-07-04"}}]}"#,
    );

    let (profiles, issues) = load_patient_profiles(dir.path(), 2024).unwrap();

    let ids: Vec<&str> = profiles.iter().map(|p| p.patient_id.as_str()).collect();
    assert_eq!(ids, ["p-a", "p-d"]);
    assert_eq!(profiles[0].age_months, 288);

    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|i| i.kind == IssueKind::MalformedInput));
    let records: Vec<&str> = issues.iter().map(|i| i.record.as_str()).collect();
    assert!(records.contains(&"c.json"));
    assert!(records.contains(&"b.json"));
    assert!(issues.iter().any(|i| i.message.contains("birthDate")));
}

#[test]
fn trial_records_load_in_filename_order() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "2.json",
        r#"{"protocolSection": {"identificationModule": {"nctId": "NCT2"}}}"#,
    );
    write(
        dir.path(),
        "1.json",
        r#"{"protocolSection": {"identificationModule": {"nctId": "NCT1"}}}"#,
    );
    write(dir.path(), "readme.md", "ignored");

    let loaded = load_trial_records(dir.path()).unwrap();
    assert!(loaded.issues.is_empty());
    let ids: Vec<&str> = loaded
        .records
        .iter()
        .map(|r| r.record.trial_id("x").unwrap())
        .collect();
    assert_eq!(ids, ["NCT1", "NCT2"]);
    assert_eq!(loaded.records[0].source_name(), "1.json");
}

#[test]
fn missing_folder_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = load_trial_records(&dir.path().join("missing"));
    assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
}
