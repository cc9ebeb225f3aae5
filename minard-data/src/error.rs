//! Error types for the Minard data layer
use thiserror::Error;

/// Main error type for loading the source table and shaping datasets
#[derive(Error, Debug)]
pub enum DataError {
    /// Failed to read or parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to parse a schema override
    #[error("Failed to parse schema: {0}")]
    SchemaParse(#[from] serde_json::Error),

    /// An expected column is absent from the header row
    #[error("Schema violation: column `{column}` not found in header")]
    MissingColumn { column: String },

    /// A numeric cell holds something other than a finite number
    #[error("Row {row}: column `{column}` is not a number: {value:?}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    /// A count or identifier column holds a fractional or negative number
    #[error("Row {row}: column `{column}` must be a non-negative integer, got {value}")]
    NotAnInteger {
        row: usize,
        column: String,
        value: f64,
    },

    /// Direction is neither advancing nor retreating
    #[error("Row {row}: unknown march direction {value:?} (expected \"A\" or \"R\")")]
    UnknownDirection { row: usize, value: String },
}

/// Type alias for Results using DataError
pub type Result<T> = std::result::Result<T, DataError>;
