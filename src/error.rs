//! Error types for the goodsfilter library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum GoodsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid count value '{value}' for specimen '{specimen}', SV column {sv}")]
    InvalidCount {
        value: String,
        specimen: String,
        sv: usize,
    },

    #[error("Specimen '{specimen}' has {actual} counts, expected {expected} (one per SV)")]
    DimensionMismatch {
        specimen: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate specimen id '{0}'")]
    DuplicateSpecimen(String),

    #[error("Specimen id '{0}' cannot be used as a file name")]
    InvalidSpecimenId(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, GoodsError>;
