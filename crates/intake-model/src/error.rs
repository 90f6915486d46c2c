//! Error types for the canonical model.

use thiserror::Error;

/// Errors raised for caller programming mistakes against the model.
///
/// Per-value conversions never produce these; they return `Option` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Field key does not name a canonical field.
    #[error("unknown canonical field: {0}")]
    UnknownField(String),

    /// Content type key is not part of the detector battery.
    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    /// Template maps two headers onto the same field.
    #[error("template maps field '{field}' more than once ('{first}' and '{second}')")]
    DuplicateTemplateField {
        field: String,
        first: String,
        second: String,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::UnknownField("shoe_size".to_string());
        assert_eq!(err.to_string(), "unknown canonical field: shoe_size");
    }
}
