//! Recognizer test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use ctm_core::{Entity, EntityRecognizer, RecognizerError};

/// Tags every occurrence of a fixed list of phrases, counting calls.
pub struct StaticRecognizer {
    terms: Vec<(String, String)>,
    calls: AtomicUsize,
}

impl StaticRecognizer {
    pub fn new(terms: &[(&str, &str)]) -> Self {
        Self {
            terms: terms
                .iter()
                .map(|(term, label)| ((*term).to_string(), (*label).to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn diseases(terms: &[&str]) -> Self {
        let pairs: Vec<_> = terms.iter().map(|t| (*t, "DISEASE")).collect();
        Self::new(&pairs)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntityRecognizer for StaticRecognizer {
    fn name(&self) -> &str {
        "static"
    }

    fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut entities = Vec::new();
        for (term, label) in &self.terms {
            for (start, matched) in text.match_indices(term.as_str()) {
                entities.push(Entity {
                    text: matched.to_string(),
                    label: label.clone(),
                    start,
                    end: start + matched.len(),
                });
            }
        }
        entities.sort_by_key(|e| e.start);
        Ok(entities)
    }
}

/// Fails whenever the text contains `trigger`, otherwise recognizes nothing.
pub struct FailingRecognizer {
    pub trigger: &'static str,
}

impl EntityRecognizer for FailingRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError> {
        if text.contains(self.trigger) {
            Err(RecognizerError::failed("model unavailable"))
        } else {
            Ok(Vec::new())
        }
    }
}
