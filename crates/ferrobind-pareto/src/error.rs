//! Error types for Pareto selection.

use ferrobind_common::objective::PolicyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParetoError>;

#[derive(Debug, Error)]
pub enum ParetoError {
    #[error("Invalid input: no objective columns given")]
    EmptyObjectives,

    #[error("Invalid input: column '{0}' not found")]
    UnknownColumn(String),

    #[error("Invalid input: column '{0}' listed more than once")]
    DuplicateColumn(String),

    #[error("Invalid input: identifier column '{0}' not found")]
    MissingIdColumn(String),

    #[error("Invalid input: row '{row}' column '{column}' is not numeric: {value:?}")]
    NonNumeric { row: String, column: String, value: String },

    #[error("Invalid input: row '{row}' column '{column}' is not finite")]
    NonFinite { row: String, column: String },

    #[error("Invalid input: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidPolicy(#[from] PolicyError),

    #[error("Invalid input: row index {row} out of range for {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Invalid input: no columns matched the objective selector")]
    EmptySelection,

    #[error("Invalid input: row '{row}' has a non-integer iteration: {value:?}")]
    InvalidIteration { row: String, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParetoError {
    /// Whether this is a validation failure of the caller's input,
    /// as opposed to an I/O or parse failure of the data source.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, ParetoError::Csv(_) | ParetoError::Io(_))
    }
}
