//! End-to-end matching over parsed records with the bundled lexicon.

use std::sync::Arc;

use ctm_core::{
    ConditionExtractor, LexiconRecognizer, MatchingOrchestrator, build_trial_criteria,
};
use ctm_ingest::{PatientBundle, TrialRecord, build_patient_profile};
use ctm_model::{MatchOptions, PatientProfile, TrialCriteria};

const REFERENCE_YEAR: i32 = 2024;

fn patient(
    id: &str,
    birth_date: &str,
    conditions: &[&str],
    allergies: &[&str],
) -> PatientProfile {
    let mut entry = vec![serde_json::json!({
        "resource": { "resourceType": "Patient", "id": id, "birthDate": birth_date }
    })];
    for condition in conditions {
        entry.push(serde_json::json!({
            "resource": {
                "resourceType": "Condition",
                "code": { "coding": [{ "display": condition }] }
            }
        }));
    }
    let allergy_list: Vec<_> = allergies
        .iter()
        .map(|a| serde_json::json!({ "code": { "text": a } }))
        .collect();
    let bundle: PatientBundle = serde_json::from_value(serde_json::json!({
        "entry": entry,
        "AllergyIntolerance": allergy_list,
    }))
    .unwrap();
    build_patient_profile(&bundle, &format!("{id}.json"), REFERENCE_YEAR).unwrap()
}

fn trial(id: &str, name: &str, criteria: &str, min_age: &str, max_age: &str) -> TrialCriteria {
    let record: TrialRecord = serde_json::from_value(serde_json::json!({
        "protocolSection": {
            "identificationModule": { "nctId": id, "briefTitle": name },
            "eligibilityModule": {
                "eligibilityCriteria": criteria,
                "minimumAge": min_age,
                "maximumAge": max_age
            }
        }
    }))
    .unwrap();
    let lexicon = LexiconRecognizer::default_diseases()
        .unwrap()
        .with_term("penicillin", "CHEMICAL");
    let extractor = ConditionExtractor::new(Arc::new(lexicon))
        .with_labels(vec!["DISEASE".to_string(), "CHEMICAL".to_string()]);
    build_trial_criteria(&record, &format!("{id}.json"), &extractor, &MatchOptions::default())
        .unwrap()
        .criteria
}

fn trials() -> Vec<Arc<TrialCriteria>> {
    vec![
        Arc::new(trial(
            "NCT00001159",
            "Thyroid Hormone Study",
            "Inclusion Criteria:\n- Hypothyroidism on stable therapy\nExclusion Criteria:\n- Diabetes",
            "18 Years",
            "65 Years",
        )),
        Arc::new(trial(
            "NCT00002000",
            "Healthy Volunteer Study",
            "Exclusion Criteria: asthma",
            "",
            "",
        )),
        Arc::new(trial(
            "NCT00003000",
            "Penicillin Safety Study",
            "Inclusion Criteria: hypertension\nExclusion Criteria: penicillin allergy",
            "",
            "",
        )),
    ]
}

fn eligible_ids(run: &ctm_model::MatchRun, patient_id: &str) -> Vec<String> {
    run.results
        .iter()
        .find(|r| r.patient_id == patient_id)
        .map(|r| r.eligible_trials.iter().map(|t| t.trial_id.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn born_2000_is_288_months_in_2024() {
    let p = patient("p1", "2000-01-01", &[], &[]);
    assert_eq!(p.age_months, 288);
    assert!((216..=1200).contains(&p.age_months));
}

#[test]
fn matches_cross_product_in_order() {
    let trials = trials();
    let patients = vec![
        patient("thyroid", "1990-05-05", &["Hypothyroidism"], &[]),
        patient("diabetic", "1990-05-05", &["Hypothyroidism", "Diabetes"], &[]),
        patient("teen", "2010-01-01", &["Hypothyroidism"], &[]),
        patient("asthmatic", "1980-01-01", &["Asthma", "Hypertension"], &[]),
    ];

    let run = MatchingOrchestrator::default().run_all(&patients, &trials);

    assert_eq!(run.results.len(), 4);
    assert_eq!(eligible_ids(&run, "thyroid"), ["NCT00001159", "NCT00002000"]);
    assert_eq!(eligible_ids(&run, "diabetic"), ["NCT00002000"]);
    assert!(eligible_ids(&run, "teen").is_empty());
    assert_eq!(eligible_ids(&run, "asthmatic"), ["NCT00003000"]);

    let thyroid = &run.results[0].eligible_trials[0];
    assert_eq!(thyroid.trial_name, "Thyroid Hormone Study");
    assert_eq!(thyroid.matched_criteria, ["hypothyroidism"]);
    let vacuous = &run.results[0].eligible_trials[1];
    assert!(vacuous.matched_criteria.is_empty());
}

#[test]
fn allergy_excludes_patient() {
    let trials = trials();
    let patients = vec![patient(
        "allergic",
        "1970-01-01",
        &["Hypertension"],
        &["Penicillin"],
    )];
    let criteria = &trials[2];
    assert!(criteria.exclusion_conditions.contains("penicillin"));

    let run = MatchingOrchestrator::default().run_all(&patients, &trials);
    assert!(!eligible_ids(&run, "allergic").contains(&"NCT00003000".to_string()));
}

#[test]
fn repeated_runs_are_identical() {
    let trials = trials();
    let patients = vec![
        patient("a", "1990-01-01", &["Hypothyroidism"], &[]),
        patient("b", "1960-01-01", &["Hypertension"], &[]),
    ];
    let orchestrator = MatchingOrchestrator::default();

    let first = orchestrator.run_all(&patients, &trials);
    let second = orchestrator.run_all(&patients, &trials);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.results).unwrap(),
        serde_json::to_string(&second.results).unwrap()
    );
}

#[test]
fn match_patient_reports_single_patient() {
    let trials = trials();
    let p = patient("solo", "1985-01-01", &["hypothyroidism"], &[]);
    let result = MatchingOrchestrator::default().match_patient(&p, &trials);
    assert_eq!(result.patient_id, "solo");
    assert!(result.is_eligible_for("NCT00001159"));
    assert!(!result.is_eligible_for("NCT00003000"));
}
