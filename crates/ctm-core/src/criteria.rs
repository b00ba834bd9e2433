//! Section splitting for free-text eligibility criteria.
//!
//! Headers are matched literally and case-insensitively:
//!
//! - `INCLUSION CRITERIA:` starts the inclusion block, which runs to the next
//!   `EXCLUSION CRITERIA:` header or the end of the text.
//! - `EXCLUSION CRITERIA:` starts the exclusion block, which runs to the end
//!   of the text.
//!
//! Only the first occurrence of each header is used. Missing sections yield
//! empty strings.

use std::fmt;

pub const INCLUSION_HEADER: &str = "inclusion criteria:";
pub const EXCLUSION_HEADER: &str = "exclusion criteria:";

/// Which block of the criteria text a condition set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaSection {
    Inclusion,
    Exclusion,
}

impl fmt::Display for CriteriaSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inclusion => f.write_str("inclusion"),
            Self::Exclusion => f.write_str("exclusion"),
        }
    }
}

/// Trimmed inclusion and exclusion blocks of a criteria text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaSections {
    pub inclusion: String,
    pub exclusion: String,
}

/// Splits raw eligibility text into inclusion and exclusion blocks.
pub fn split_criteria(raw: &str) -> CriteriaSections {
    // ASCII lowercasing keeps byte offsets aligned with `raw`.
    let lower = raw.to_ascii_lowercase();

    let inclusion = match lower.find(INCLUSION_HEADER) {
        Some(index) => {
            let start = index + INCLUSION_HEADER.len();
            let end = lower[start..]
                .find(EXCLUSION_HEADER)
                .map_or(raw.len(), |offset| start + offset);
            raw[start..end].trim().to_string()
        }
        None => String::new(),
    };

    let exclusion = match lower.find(EXCLUSION_HEADER) {
        Some(index) => raw[index + EXCLUSION_HEADER.len()..].trim().to_string(),
        None => String::new(),
    };

    CriteriaSections {
        inclusion,
        exclusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_both_sections() {
        let sections = split_criteria(
            "INCLUSION CRITERIA:\n* Hypothyroidism\n\nEXCLUSION CRITERIA:\n* Diabetes\n",
        );
        assert_eq!(sections.inclusion, "* Hypothyroidism");
        assert_eq!(sections.exclusion, "* Diabetes");
    }

    #[test]
    fn headers_are_case_insensitive() {
        let sections = split_criteria("Inclusion Criteria: asthma exclusion criteria: anemia");
        assert_eq!(sections.inclusion, "asthma");
        assert_eq!(sections.exclusion, "anemia");
    }

    #[test]
    fn missing_sections_are_empty() {
        assert_eq!(split_criteria("No headers at all"), CriteriaSections::default());
        assert_eq!(split_criteria(""), CriteriaSections::default());

        let only_exclusion = split_criteria("EXCLUSION CRITERIA: Anemia patients");
        assert_eq!(only_exclusion.inclusion, "");
        assert_eq!(only_exclusion.exclusion, "Anemia patients");

        let only_inclusion = split_criteria("INCLUSION CRITERIA: Hypothyroidism patients");
        assert_eq!(only_inclusion.inclusion, "Hypothyroidism patients");
        assert_eq!(only_inclusion.exclusion, "");
    }

    #[test]
    fn text_before_inclusion_header_is_ignored() {
        let sections = split_criteria("Summary text. INCLUSION CRITERIA: copd");
        assert_eq!(sections.inclusion, "copd");
    }

    #[test]
    fn header_without_colon_is_not_a_header() {
        let sections = split_criteria("INCLUSION CRITERIA asthma");
        assert_eq!(sections.inclusion, "");
    }

    #[test]
    fn exclusion_before_inclusion_runs_to_end() {
        let sections = split_criteria("EXCLUSION CRITERIA: gout INCLUSION CRITERIA: asthma");
        assert_eq!(sections.inclusion, "asthma");
        assert_eq!(sections.exclusion, "gout INCLUSION CRITERIA: asthma");
    }

    #[test]
    fn non_ascii_text_keeps_offsets() {
        let sections = split_criteria("INCLUSION CRITERIA: Sjögren’s syndrome EXCLUSION CRITERIA: ß-thalassemia");
        assert_eq!(sections.inclusion, "Sjögren’s syndrome");
        assert_eq!(sections.exclusion, "ß-thalassemia");
    }
}
