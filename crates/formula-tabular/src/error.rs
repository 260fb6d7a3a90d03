use thiserror::Error;

pub type TableResult<T> = Result<T, TableError>;

/// Errors returned at the fallible boundaries of the table engine.
///
/// The row pipeline itself never fails: it degrades to `Null` cells or empty pages instead.
/// Only constructing a validated [`crate::DataFrame`] and parsing panel options can error.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("field {field} has {actual} values, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate field name: {name}")]
    DuplicateField { name: String },

    #[error("invalid table options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
