//! Error types for mapping operations.

use intake_model::CanonicalField;
use thiserror::Error;

/// Errors raised for inconsistent caller input.
///
/// Scoring itself never fails; only overrides that contradict each other
/// or the header list are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// An override names a column that does not exist.
    #[error("override for column {column} is out of range ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// Two overrides target the same field.
    #[error("field {field} is overridden for both column {first} and column {second}")]
    FieldAlreadyAssigned {
        field: CanonicalField,
        first: usize,
        second: usize,
    },
}

pub type Result<T> = std::result::Result<T, MappingError>;
