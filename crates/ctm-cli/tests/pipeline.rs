//! Integration tests for the matching pipeline.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use ctm_cli::pipeline::{PipelineConfig, inspect_criteria, run_pipeline};
use ctm_model::{IssueKind, MatchOptions, PatientResult};
use ctm_report::ReportFormat;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn patient_json(id: &str, birth_date: &str, conditions: &[&str]) -> String {
    let mut entry = vec![serde_json::json!({
        "resource": { "resourceType": "Patient", "id": id, "birthDate": birth_date }
    })];
    for condition in conditions {
        entry.push(serde_json::json!({
            "resource": {
                "resourceType": "Condition",
                "code": { "coding": [{ "system": "http://snomed.info/sct", "display": condition }] }
            }
        }));
    }
    serde_json::json!({ "resourceType": "Bundle", "entry": entry }).to_string()
}

fn trial_json(id: &str, title: &str, criteria: &str, min_age: &str, max_age: &str) -> String {
    serde_json::json!({
        "protocolSection": {
            "identificationModule": { "nctId": id, "briefTitle": title },
            "eligibilityModule": {
                "eligibilityCriteria": criteria,
                "minimumAge": min_age,
                "maximumAge": max_age
            }
        }
    })
    .to_string()
}

struct Fixture {
    _root: TempDir,
    patients: PathBuf,
    trials: PathBuf,
    output: PathBuf,
}

fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let patients = root.path().join("patients");
    let trials = root.path().join("trials");
    std::fs::create_dir_all(&patients).unwrap();
    std::fs::create_dir_all(&trials).unwrap();

    write(
        &patients,
        "p1.json",
        &patient_json("patient-1", "1990-03-04", &["Hypothyroidism"]),
    );
    write(
        &patients,
        "p2.json",
        &patient_json("patient-2", "1950-11-30", &["Diabetes", "Hypothyroidism"]),
    );
    write(
        &patients,
        "p3.json",
        r#"{"entry": [{"resource": {"resourceType": "Patient", "id": "patient-3"}}]}"#,
    );
    write(&patients, "notes.txt", "not a patient");

    write(
        &trials,
        "t1.json",
        &trial_json(
            "NCT00001159",
            "Thyroid Hormone Study",
            "Inclusion Criteria:\n- Hypothyroidism\n\nExclusion Criteria:\n- Diabetes",
            "18 Years",
            "65 Years",
        ),
    );
    write(
        &trials,
        "t2.json",
        &trial_json(
            "NCT00002000",
            "Asthma Study",
            "Inclusion Criteria: asthma",
            "",
            "",
        ),
    );
    write(
        &trials,
        "t3.json",
        &trial_json("NCT00001159", "Copy", "Inclusion Criteria: gout", "", ""),
    );
    write(&trials, "t4.json", "{ broken");

    let output = root.path().join("out");
    Fixture {
        patients,
        trials,
        output,
        _root: root,
    }
}

fn config(fixture: &Fixture, format: ReportFormat) -> PipelineConfig {
    PipelineConfig {
        patients_dir: fixture.patients.clone(),
        trials_dir: fixture.trials.clone(),
        options: MatchOptions::default().with_reference_year(2024),
        lexicon: None,
        output_dir: Some(fixture.output.clone()),
        format,
    }
}

#[test]
fn test_run_pipeline_end_to_end() {
    let fixture = fixture();
    let summary = run_pipeline(&config(&fixture, ReportFormat::Both)).unwrap();

    assert_eq!(summary.reference_year, 2024);
    assert_eq!(summary.patient_count, 2);
    assert_eq!(summary.trial_count, 2);

    let results = &summary.run.results;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].patient_id, "patient-1");
    assert!(results[0].is_eligible_for("NCT00001159"));
    assert_eq!(
        results[0].eligible_trials[0].matched_criteria,
        ["hypothyroidism"]
    );
    assert_eq!(results[1].patient_id, "patient-2");
    assert!(results[1].eligible_trials.is_empty());

    let issues: Vec<_> = summary
        .run
        .issues
        .iter()
        .map(|i| (i.kind, i.record.as_str()))
        .collect();
    assert_eq!(
        issues,
        [
            (IssueKind::MalformedInput, "p3.json"),
            (IssueKind::MalformedInput, "t4.json"),
            (IssueKind::DuplicateTrial, "NCT00001159"),
        ]
    );
    assert!(summary.has_issues());

    let outputs = summary.outputs.as_ref().unwrap();
    assert_eq!(outputs.paths().count(), 3);
    let written: Vec<PatientResult> = serde_json::from_str(
        &std::fs::read_to_string(fixture.output.join("results.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(&written, results);

    let csv = std::fs::read_to_string(fixture.output.join("results.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        [
            "trialId,trialName,eligibilityCriteriaMet,patientId",
            "NCT00001159,Thyroid Hormone Study,hypothyroidism,patient-1",
        ]
    );

    let issues_json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(fixture.output.join("issues.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(issues_json.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_dry_run_writes_nothing() {
    let fixture = fixture();
    let mut config = config(&fixture, ReportFormat::Json);
    config.output_dir = None;

    let summary = run_pipeline(&config).unwrap();

    assert!(summary.outputs.is_none());
    assert!(!fixture.output.exists());
    assert_eq!(summary.run.results.len(), 2);
}

#[test]
fn test_sequential_matches_parallel() {
    let fixture = fixture();
    let parallel = run_pipeline(&config(&fixture, ReportFormat::Json)).unwrap();
    let mut sequential_config = config(&fixture, ReportFormat::Json);
    sequential_config.options = sequential_config.options.sequential();
    let sequential = run_pipeline(&sequential_config).unwrap();

    assert_eq!(parallel.run, sequential.run);
}

#[test]
fn test_custom_lexicon_replaces_builtin() {
    let fixture = fixture();
    let lexicon = fixture.output.with_file_name("lexicon.csv");
    std::fs::write(&lexicon, "term,label\ngout,DISEASE\n").unwrap();

    let summary =
        inspect_criteria(&fixture.trials, Some(&lexicon), &MatchOptions::default()).unwrap();

    let thyroid = &summary.trials[0];
    assert_eq!(thyroid.trial_id, "NCT00001159");
    assert!(thyroid.inclusion_conditions.is_empty());
    assert_eq!(summary.trials.len(), 2);
    assert!(summary.has_issues());
}

#[test]
fn test_missing_patients_dir_is_fatal() {
    let fixture = fixture();
    let mut config = config(&fixture, ReportFormat::Json);
    config.patients_dir = fixture.patients.join("missing");

    let error = run_pipeline(&config).unwrap_err();
    assert!(format!("{error:#}").contains("load patients"));
}

#[test]
fn test_missing_lexicon_is_fatal() {
    let fixture = fixture();
    let mut config = config(&fixture, ReportFormat::Json);
    config.lexicon = Some(fixture.trials.join("nope.csv"));

    let error = run_pipeline(&config).unwrap_err();
    assert!(format!("{error:#}").contains("load lexicon"));
}
