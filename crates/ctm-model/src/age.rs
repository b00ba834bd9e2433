//! Age bounds expressed in months.
//!
//! Every age in the matcher is compared in whole months. Trials carry two
//! bounds and each bound remembers where its value came from, so a defaulted
//! bound can be told apart from one the trial actually stated.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Minimum age applied when a trial states none: 18 years.
pub const DEFAULT_MIN_AGE_MONTHS: u32 = 18 * MONTHS_PER_YEAR;

/// Maximum age applied when a trial states none: 100 years.
pub const DEFAULT_MAX_AGE_MONTHS: u32 = 100 * MONTHS_PER_YEAR;

/// Which end of the age range a bound describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBoundKind {
    Minimum,
    Maximum,
}

impl AgeBoundKind {
    /// Policy default for this bound when neither an explicit field nor the
    /// criteria text provides one.
    pub fn default_months(self) -> u32 {
        match self {
            Self::Minimum => DEFAULT_MIN_AGE_MONTHS,
            Self::Maximum => DEFAULT_MAX_AGE_MONTHS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
        }
    }
}

impl fmt::Display for AgeBoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of an age bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeSource {
    /// Parsed from a structured age field such as `"18 Years"`.
    Explicit,
    /// Found by pattern search in the free-text criteria.
    CriteriaText,
    /// Neither source produced a value; the documented default applies.
    Default,
}

impl AgeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::CriteriaText => "criteria text",
            Self::Default => "default",
        }
    }
}

/// A resolved age bound in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBound {
    pub months: u32,
    pub source: AgeSource,
}

impl AgeBound {
    pub fn explicit(months: u32) -> Self {
        Self {
            months,
            source: AgeSource::Explicit,
        }
    }

    pub fn from_criteria_text(months: u32) -> Self {
        Self {
            months,
            source: AgeSource::CriteriaText,
        }
    }

    pub fn defaulted(months: u32) -> Self {
        Self {
            months,
            source: AgeSource::Default,
        }
    }

    pub fn is_default(&self) -> bool {
        self.source == AgeSource::Default
    }

    /// Whole years, rounded down. Used for display only.
    pub fn years(&self) -> u32 {
        self.months / MONTHS_PER_YEAR
    }
}

impl fmt::Display for AgeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months % MONTHS_PER_YEAR == 0 {
            write!(f, "{}y ({})", self.years(), self.source.as_str())
        } else {
            write!(f, "{}m ({})", self.months, self.source.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_18_and_100_years() {
        assert_eq!(AgeBoundKind::Minimum.default_months(), 216);
        assert_eq!(AgeBoundKind::Maximum.default_months(), 1200);
    }

    #[test]
    fn display_prefers_years() {
        assert_eq!(AgeBound::explicit(216).to_string(), "18y (explicit)");
        assert_eq!(AgeBound::from_criteria_text(6).to_string(), "6m (criteria text)");
        assert_eq!(AgeBound::defaulted(1200).to_string(), "100y (default)");
    }
}
