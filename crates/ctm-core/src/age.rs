//! Age normalization.
//!
//! Turns the age representations found in trial records into months:
//!
//! 1. An explicit age field such as `"18 Years"` or `"6 Months"`.
//! 2. Otherwise, the first bound-specific phrase in the criteria text, such as
//!    `"Age >= 18 years"` for a minimum or `"age younger than 65 years"` for a
//!    maximum. Only the first match is honored.
//! 3. Otherwise, the policy default for the bound (18 years minimum,
//!    100 years maximum).
//!
//! An explicit field that is present but cannot be parsed resolves to the
//! default; it does not fall back to the criteria text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use ctm_model::{AgeBound, AgeBoundKind, MONTHS_PER_YEAR};

/// Leading integer followed by a year or month unit word.
static EXPLICIT_AGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s*(years?|months?)\b").expect("Invalid explicit age regex")
});

static MIN_AGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)age\s*(>=|≥|>|older than)\s*(\d+)\s*(years?|months?)")
        .expect("Invalid minimum age regex")
});

static MAX_AGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)age\s*(<=|≤|<|younger than)\s*(\d+)\s*(years?|months?)")
        .expect("Invalid maximum age regex")
});

/// Parses an explicit age string into months.
///
/// Returns `None` for unparsable input, units other than years or months,
/// and values that overflow.
pub fn parse_age_string(value: &str) -> Option<u32> {
    let captures = EXPLICIT_AGE_REGEX.captures(value)?;
    to_months(&captures[1], &captures[2])
}

/// Searches criteria text for the first phrase stating the given bound.
pub fn age_from_criteria(text: &str, kind: AgeBoundKind) -> Option<u32> {
    let regex = match kind {
        AgeBoundKind::Minimum => &*MIN_AGE_REGEX,
        AgeBoundKind::Maximum => &*MAX_AGE_REGEX,
    };
    let captures = regex.captures(text)?;
    to_months(&captures[2], &captures[3])
}

/// Resolves one age bound with an explicit default for the no-data case.
pub fn resolve_age_bound(
    explicit: Option<&str>,
    criteria_text: &str,
    kind: AgeBoundKind,
    default_months: u32,
) -> AgeBound {
    match explicit.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => match parse_age_string(value) {
            Some(months) => AgeBound::explicit(months),
            None => {
                debug!(bound = %kind, value, "unparsable explicit age, using default");
                AgeBound::defaulted(default_months)
            }
        },
        None => match age_from_criteria(criteria_text, kind) {
            Some(months) => AgeBound::from_criteria_text(months),
            None => AgeBound::defaulted(default_months),
        },
    }
}

/// Resolves one age bound using the standard defaults.
pub fn normalize_age(explicit: Option<&str>, criteria_text: &str, kind: AgeBoundKind) -> AgeBound {
    resolve_age_bound(explicit, criteria_text, kind, kind.default_months())
}

fn to_months(value: &str, unit: &str) -> Option<u32> {
    let value: u32 = value.parse().ok()?;
    if unit.to_ascii_lowercase().starts_with("year") {
        value.checked_mul(MONTHS_PER_YEAR)
    } else {
        Some(value)
    }
}
