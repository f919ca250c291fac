//! Error types for the erminej-tools library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ErmineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Invalid numeric value '{value}' at row {row}, column '{column}'")]
    InvalidValue {
        value: String,
        row: usize,
        column: String,
    },

    #[error("Row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Empty data: {0}")]
    EmptyData(String),

    /// No shuffled-control columns were found, so the empirical p-value
    /// would divide by zero.
    #[error("Division by zero: row has no shuffled-control columns")]
    NoShuffleColumns,

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ErmineError>;
