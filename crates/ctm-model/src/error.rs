use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{field} must not be empty")]
    EmptyIdentifier { field: &'static str },
    #[error("trial {trial_id}: minimum age {min_months} months exceeds maximum age {max_months} months")]
    InvertedAgeRange {
        trial_id: String,
        min_months: u32,
        max_months: u32,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
