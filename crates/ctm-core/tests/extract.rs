mod support;

use std::sync::Arc;

use ctm_core::{ConditionExtractor, CriteriaSection};
use ctm_model::ConditionSet;

use support::{FailingRecognizer, StaticRecognizer};

#[test]
fn empty_text_does_not_call_recognizer() {
    let recognizer = Arc::new(StaticRecognizer::diseases(&["asthma"]));
    let extractor = ConditionExtractor::new(recognizer.clone());

    assert!(extractor.extract("").is_empty());
    assert!(extractor.extract("  \n\t ").is_empty());
    assert_eq!(recognizer.calls(), 0);

    extractor.extract("asthma");
    assert_eq!(recognizer.calls(), 1);
}

#[test]
fn keeps_only_disease_labels() {
    let recognizer = Arc::new(StaticRecognizer::new(&[
        ("Asthma", "DISEASE"),
        ("albuterol", "CHEMICAL"),
        ("gout", "disease"),
    ]));
    let extractor = ConditionExtractor::new(recognizer);

    let conditions = extractor.extract("Asthma treated with albuterol; history of gout");
    assert_eq!(conditions.as_slice(), ["asthma", "gout"]);
}

#[test]
fn custom_labels_replace_default() {
    let recognizer = Arc::new(StaticRecognizer::new(&[
        ("asthma", "DISEASE"),
        ("albuterol", "CHEMICAL"),
    ]));
    let extractor = ConditionExtractor::new(recognizer).with_labels(vec!["chemical".to_string()]);

    let conditions = extractor.extract("asthma, albuterol");
    assert_eq!(conditions.as_slice(), ["albuterol"]);
}

#[test]
fn duplicates_collapse_after_normalization() {
    let recognizer = Arc::new(StaticRecognizer::diseases(&["Anemia", "anemia", "ANEMIA"]));
    let extractor = ConditionExtractor::new(recognizer);

    let conditions = extractor.extract("Anemia, anemia and ANEMIA");
    assert_eq!(conditions.as_slice(), ["anemia"]);
}

#[test]
fn extract_criteria_splits_blocks() {
    let recognizer = Arc::new(StaticRecognizer::diseases(&["hypothyroidism", "diabetes"]));
    let extractor = ConditionExtractor::new(recognizer);

    let extracted = extractor.extract_criteria(
        "INCLUSION CRITERIA: patients with hypothyroidism\nEXCLUSION CRITERIA: diabetes",
    );
    assert_eq!(extracted.inclusion.as_slice(), ["hypothyroidism"]);
    assert_eq!(extracted.exclusion.as_slice(), ["diabetes"]);
    assert!(extracted.failures.is_empty());
}

#[test]
fn exclusion_drops_conditions_already_required() {
    let recognizer = Arc::new(StaticRecognizer::diseases(&["asthma", "copd"]));
    let extractor = ConditionExtractor::new(recognizer);

    let inclusion: ConditionSet = ["asthma"].into_iter().collect();
    let exclusion = extractor.extract_exclusion("uncontrolled asthma or copd", &inclusion);
    assert_eq!(exclusion.as_slice(), ["copd"]);
}

#[test]
fn failure_in_one_block_leaves_other_intact() {
    let extractor = ConditionExtractor::new(Arc::new(FailingRecognizer { trigger: "boom" }));

    let extracted =
        extractor.extract_criteria("Inclusion Criteria: fine\nExclusion Criteria: boom");
    assert!(extracted.inclusion.is_empty());
    assert!(extracted.exclusion.is_empty());
    assert_eq!(extracted.failures.len(), 1);
    assert_eq!(extracted.failures[0].0, CriteriaSection::Exclusion);
}

#[test]
fn extract_swallows_failure() {
    let extractor = ConditionExtractor::new(Arc::new(FailingRecognizer { trigger: "x" }));
    assert!(extractor.extract("x").is_empty());
    assert!(extractor.try_extract("x").is_err());
}
