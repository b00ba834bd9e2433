//! Normalized, deduplicated condition-name sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Normalize a condition name for comparison: lowercase with runs of
/// whitespace collapsed to a single space. Returns `None` for blank input.
pub fn normalize_condition(value: &str) -> Option<String> {
    let normalized = value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// A set of normalized condition names that remembers insertion order.
///
/// Membership is exact string equality on the normalized form, so
/// `"Type 2  Diabetes"` and `"type 2 diabetes"` are the same member while
/// `"diabetes mellitus type 2"` is not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ConditionSet {
    items: Vec<String>,
    lookup: HashSet<String>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a condition. Returns `true` when the normalized value was not
    /// already present; blank values are ignored.
    pub fn insert(&mut self, value: impl AsRef<str>) -> bool {
        let Some(normalized) = normalize_condition(value.as_ref()) else {
            return false;
        };
        if self.lookup.contains(&normalized) {
            return false;
        }
        self.lookup.insert(normalized.clone());
        self.items.push(normalized);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        match normalize_condition(value) {
            Some(normalized) => self.lookup.contains(&normalized),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Members of `self` that are also in `other`, in `self`'s order.
    pub fn intersection_ordered(&self, other: &ConditionSet) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| other.lookup.contains(*item))
            .cloned()
            .collect()
    }

    /// First member of `self` also present in `other`.
    pub fn first_shared(&self, other: &ConditionSet) -> Option<&str> {
        self.items
            .iter()
            .find(|item| other.lookup.contains(*item))
            .map(String::as_str)
    }
}

impl PartialEq for ConditionSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ConditionSet {}

impl<S: AsRef<str>> FromIterator<S> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<S: AsRef<str>> Extend<S> for ConditionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<String>> for ConditionSet {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<ConditionSet> for Vec<String> {
    fn from(set: ConditionSet) -> Self {
        set.items
    }
}
