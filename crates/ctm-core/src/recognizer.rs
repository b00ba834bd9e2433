//! Entity recognition seam.
//!
//! The matcher treats named-entity recognition as an external service. It
//! only needs spans of text tagged with a label; which model produces them is
//! not its concern. [`EntityRecognizer`] is that seam, and implementations
//! are injected into [`ConditionExtractor`](crate::extract::ConditionExtractor)
//! so tests and alternative back ends can be substituted.
//!
//! [`LexiconRecognizer`] is the bundled implementation: a deterministic
//! dictionary (gazetteer) matcher that tags the longest known phrase at each
//! word position.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use ctm_model::DISEASE_LABEL;

/// Default disease lexicon shipped with the crate.
const DEFAULT_LEXICON: &str = include_str!("../data/disease_lexicon.csv");

/// A labelled span of the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Surface text exactly as it appears in the input.
    pub text: String,
    pub label: String,
    /// Byte offset of the span start.
    pub start: usize,
    /// Byte offset one past the span end.
    pub end: usize,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecognizerError {
    /// The recognizer could not process the text.
    #[error("entity recognition failed: {message}")]
    Failed { message: String },

    #[error("failed to read lexicon {path}: {source}")]
    LexiconFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse lexicon: {source}")]
    LexiconParse {
        #[source]
        source: csv::Error,
    },
}

impl RecognizerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Tags entity mentions in free text.
///
/// Implementations must be safe to share across threads; the matcher calls
/// them from the criteria-building stage and holds them behind an `Arc`.
pub trait EntityRecognizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str {
        "recognizer"
    }

    fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError>;
}

#[derive(Debug, Deserialize)]
struct LexiconRow {
    term: String,
    #[serde(default)]
    label: String,
}

/// Dictionary recognizer with longest-match scanning over word tokens.
#[derive(Debug, Clone, Default)]
pub struct LexiconRecognizer {
    phrases: HashMap<String, String>,
    max_tokens: usize,
}

impl LexiconRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the embedded default disease lexicon.
    pub fn default_diseases() -> Result<Self, RecognizerError> {
        Self::from_csv_reader(DEFAULT_LEXICON.as_bytes())
    }

    /// Loads a `term,label` CSV with a header row. Blank labels default to
    /// `DISEASE`; blank terms are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, RecognizerError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut lexicon = Self::new();
        for row in reader.deserialize::<LexiconRow>() {
            let row = row.map_err(|source| RecognizerError::LexiconParse { source })?;
            let label = if row.label.is_empty() {
                DISEASE_LABEL
            } else {
                row.label.as_str()
            };
            lexicon.add_term(&row.term, label);
        }
        Ok(lexicon)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, RecognizerError> {
        let file = File::open(path).map_err(|e| RecognizerError::LexiconFile {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::from_csv_reader(file).map_err(|error| match error {
            RecognizerError::LexiconParse { source } => RecognizerError::LexiconFile {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Adds a term. Returns `false` for terms with no word tokens.
    pub fn add_term(&mut self, term: &str, label: &str) -> bool {
        let tokens = tokenize(term);
        if tokens.is_empty() {
            return false;
        }
        let key = phrase_key(term, &tokens);
        self.max_tokens = self.max_tokens.max(tokens.len());
        self.phrases.insert(key, label.to_string());
        true
    }

    pub fn with_term(mut self, term: &str, label: &str) -> Self {
        self.add_term(term, label);
        self
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl EntityRecognizer for LexiconRecognizer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError> {
        let tokens = tokenize(text);
        let mut entities = Vec::new();
        let mut index = 0;
        while index < tokens.len() {
            let longest = self.max_tokens.min(tokens.len() - index);
            let mut matched = None;
            for width in (1..=longest).rev() {
                let window = &tokens[index..index + width];
                if let Some(label) = self.phrases.get(&phrase_key(text, window)) {
                    matched = Some((width, label));
                    break;
                }
            }
            match matched {
                Some((width, label)) => {
                    let start = tokens[index].0;
                    let end = tokens[index + width - 1].1;
                    entities.push(Entity {
                        text: text[start..end].to_string(),
                        label: label.clone(),
                        start,
                        end,
                    });
                    index += width;
                }
                None => index += 1,
            }
        }
        Ok(entities)
    }
}

/// Byte ranges of word tokens. A word is a run of alphanumerics; an
/// apostrophe or hyphen between two alphanumerics stays inside the word.
fn tokenize(text: &str) -> Vec<(usize, usize)> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if ch.is_alphanumeric() {
            if start.is_none() {
                start = Some(index);
            }
            continue;
        }
        let joins_word = matches!(ch, '\'' | '’' | '-')
            && start.is_some()
            && chars.peek().is_some_and(|(_, next)| next.is_alphanumeric());
        if joins_word {
            continue;
        }
        if let Some(begin) = start.take() {
            tokens.push((begin, index));
        }
    }
    if let Some(begin) = start {
        tokens.push((begin, text.len()));
    }
    tokens
}

fn phrase_key(text: &str, tokens: &[(usize, usize)]) -> String {
    tokens
        .iter()
        .map(|&(start, end)| text[start..end].to_lowercase().replace('’', "'"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(entities: &[Entity]) -> Vec<&str> {
        entities.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn tokenize_keeps_inner_joiners() {
        let text = "Crohn's non-small -cell x";
        let words: Vec<&str> = tokenize(text).iter().map(|&(s, e)| &text[s..e]).collect();
        assert_eq!(words, ["Crohn's", "non-small", "cell", "x"]);
    }

    #[test]
    fn prefers_longest_phrase() {
        let lexicon = LexiconRecognizer::new()
            .with_term("diabetes", "DISEASE")
            .with_term("type 2 diabetes", "DISEASE");
        let entities = lexicon
            .recognize("History of Type 2  Diabetes and diabetes.")
            .unwrap();
        assert_eq!(texts(&entities), ["Type 2  Diabetes", "diabetes"]);
        assert_eq!(entities[0].start, 11);
    }

    #[test]
    fn matches_whole_words_only() {
        let lexicon = LexiconRecognizer::new().with_term("gout", "DISEASE");
        assert!(lexicon.recognize("Sprouts are goutish").unwrap().is_empty());
        assert_eq!(texts(&lexicon.recognize("GOUT, flare").unwrap()), ["GOUT"]);
    }

    #[test]
    fn keeps_labels() {
        let lexicon = LexiconRecognizer::new()
            .with_term("metformin", "CHEMICAL")
            .with_term("anemia", "DISEASE");
        let entities = lexicon.recognize("Anemia treated with metformin").unwrap();
        let labels: Vec<&str> = entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["DISEASE", "CHEMICAL"]);
    }

    #[test]
    fn loads_csv_with_default_label() {
        let csv = "term,label\nAsthma,\n  ,DISEASE\nibuprofen,CHEMICAL\n";
        let lexicon = LexiconRecognizer::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(lexicon.len(), 2);
        let entities = lexicon.recognize("asthma").unwrap();
        assert_eq!(entities[0].label, DISEASE_LABEL);
    }

    #[test]
    fn default_lexicon_loads() {
        let lexicon = LexiconRecognizer::default_diseases().unwrap();
        assert!(!lexicon.is_empty());
        let entities = lexicon
            .recognize("Patients with hypothyroidism; no Crohn’s disease")
            .unwrap();
        assert_eq!(texts(&entities), ["hypothyroidism", "Crohn’s disease"]);
    }
}
