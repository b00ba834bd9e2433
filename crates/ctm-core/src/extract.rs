//! Condition extraction from criteria text.

use std::sync::Arc;

use tracing::{debug, warn};

use ctm_model::{ConditionSet, DISEASE_LABEL};

use crate::criteria::{CriteriaSection, split_criteria};
use crate::recognizer::{EntityRecognizer, RecognizerError};

/// Inclusion and exclusion condition sets for one criteria text.
#[derive(Debug, Default)]
pub struct ExtractedCriteria {
    pub inclusion: ConditionSet,
    pub exclusion: ConditionSet,
    /// Blocks whose recognition failed. Each failed block contributes an
    /// empty set.
    pub failures: Vec<(CriteriaSection, RecognizerError)>,
}

/// Turns criteria text blocks into normalized condition sets using an
/// injected [`EntityRecognizer`].
#[derive(Clone)]
pub struct ConditionExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
    labels: Vec<String>,
}

impl std::fmt::Debug for ConditionExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionExtractor")
            .field("recognizer", &self.recognizer.name())
            .field("labels", &self.labels)
            .finish()
    }
}

impl ConditionExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            labels: vec![DISEASE_LABEL.to_string()],
        }
    }

    /// Replaces the set of labels treated as condition mentions.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    fn is_condition_label(&self, label: &str) -> bool {
        self.labels
            .iter()
            .any(|l| l.trim().eq_ignore_ascii_case(label.trim()))
    }

    /// Extracts condition mentions from a text block.
    ///
    /// Blank text returns an empty set without calling the recognizer.
    pub fn try_extract(&self, text: &str) -> Result<ConditionSet, RecognizerError> {
        self.try_extract_excluding(text, &ConditionSet::new())
    }

    /// Like [`try_extract`](Self::try_extract), but drops conditions already
    /// in `suppressed`. Used for exclusion blocks so a condition is never both
    /// required and excluded by the same trial.
    pub fn try_extract_excluding(
        &self,
        text: &str,
        suppressed: &ConditionSet,
    ) -> Result<ConditionSet, RecognizerError> {
        if text.trim().is_empty() {
            return Ok(ConditionSet::new());
        }
        let entities = self.recognizer.recognize(text)?;
        let mut conditions = ConditionSet::new();
        for entity in entities {
            if !self.is_condition_label(&entity.label) || suppressed.contains(&entity.text) {
                continue;
            }
            conditions.insert(&entity.text);
        }
        Ok(conditions)
    }

    /// Extracts conditions, treating a recognizer failure as an empty set.
    pub fn extract(&self, text: &str) -> ConditionSet {
        self.try_extract(text).unwrap_or_else(|error| {
            warn!(recognizer = self.recognizer.name(), %error, "entity recognition failed");
            ConditionSet::new()
        })
    }

    /// Extracts an exclusion set, suppressing members of `inclusion`.
    pub fn extract_exclusion(&self, text: &str, inclusion: &ConditionSet) -> ConditionSet {
        self.try_extract_excluding(text, inclusion)
            .unwrap_or_else(|error| {
                warn!(recognizer = self.recognizer.name(), %error, "entity recognition failed");
                ConditionSet::new()
            })
    }

    /// Splits raw criteria text and extracts both condition sets.
    ///
    /// A failure in one block does not affect the other; failures are
    /// returned for the caller to report.
    pub fn extract_criteria(&self, raw_text: &str) -> ExtractedCriteria {
        let sections = split_criteria(raw_text);
        let mut extracted = ExtractedCriteria::default();

        match self.try_extract(&sections.inclusion) {
            Ok(set) => extracted.inclusion = set,
            Err(error) => extracted.failures.push((CriteriaSection::Inclusion, error)),
        }
        match self.try_extract_excluding(&sections.exclusion, &extracted.inclusion) {
            Ok(set) => extracted.exclusion = set,
            Err(error) => extracted.failures.push((CriteriaSection::Exclusion, error)),
        }

        debug!(
            inclusion_count = extracted.inclusion.len(),
            exclusion_count = extracted.exclusion.len(),
            failures = extracted.failures.len(),
            "criteria conditions extracted"
        );
        extracted
    }
}
