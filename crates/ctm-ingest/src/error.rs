//! Error types for record ingestion.

use std::path::PathBuf;
use thiserror::Error;

use ctm_model::ModelError;

/// Errors that can occur while discovering and reading records.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Document Errors ===
    /// File is not a valid JSON document of the expected shape.
    #[error("failed to parse {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required field is absent or blank.
    #[error("{record}: missing required field '{field}'")]
    MissingField { record: String, field: &'static str },

    /// Birth date has no usable year.
    #[error("{record}: invalid birth date '{value}'")]
    InvalidBirthDate { record: String, value: String },

    /// Birth year lies after the reference year.
    #[error("{record}: birth year {birth_year} is after reference year {reference_year}")]
    BirthAfterReference {
        record: String,
        birth_year: i32,
        reference_year: i32,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
