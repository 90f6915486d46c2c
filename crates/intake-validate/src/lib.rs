//! Validation of canonical import records.
//!
//! Per-field rules cover value formats and checksums; cross-field rules
//! cover date plausibility. Every finding is a [`ValidationIssue`] with a
//! 1-based row, a field, a message and an optional suggestion. Batch
//! validation buckets rows into valid, warning and error.

pub mod batch;
pub mod checks;
pub mod issue;
pub mod options;

pub use batch::{BatchStats, BatchValidation, Progress, Validator, validate_batch};
pub use checks::check_record;
pub use checks::iban::is_valid_iban;
pub use issue::{Category, Issue, Severity, ValidationIssue};
pub use options::ValidationOptions;
