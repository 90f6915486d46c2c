//! Record-level checks.

pub mod coded;
pub mod dates;
pub mod fields;
pub mod iban;

use intake_model::{CanonicalRecord, TransformOptions};

use crate::issue::Issue;
use crate::options::ValidationOptions;

/// Run every check against one record.
pub fn check_record(
    record: &CanonicalRecord,
    options: &ValidationOptions,
    vocabularies: &TransformOptions,
) -> Vec<Issue> {
    let mut issues = fields::check(record);
    issues.extend(coded::check(record, vocabularies));
    issues.extend(dates::check(record, options));
    issues
}
