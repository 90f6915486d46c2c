//! Batch validation with row-bucket statistics and progress reporting.

use std::ops::ControlFlow;

use intake_model::{CanonicalRecord, TransformOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::checks::check_record;
use crate::issue::{Severity, ValidationIssue};
use crate::options::ValidationOptions;

/// Rows bucketed by their worst issue.
///
/// `valid_rows + warning_rows + error_rows == total_rows`. Rows with only
/// informational issues count as valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub warning_rows: usize,
    pub error_rows: usize,
}

impl BatchStats {
    /// True when no row has an error.
    pub fn is_valid(&self) -> bool {
        self.error_rows == 0
    }

    fn record(&mut self, worst: Option<Severity>) {
        self.total_rows += 1;
        match worst {
            Some(Severity::Error) => self.error_rows += 1,
            Some(Severity::Warning) => self.warning_rows += 1,
            Some(Severity::Info) | None => self.valid_rows += 1,
        }
    }
}

/// Result of validating a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchValidation {
    pub issues: Vec<ValidationIssue>,
    pub stats: BatchStats,
    /// Set when the progress callback stopped the batch early; `stats`
    /// then cover only the processed rows.
    pub cancelled: bool,
}

impl BatchValidation {
    /// Number of issues with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Issues for one 1-based row.
    pub fn issues_for_row(&self, row: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.row == row)
    }
}

/// Progress report passed to the batch callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

/// Validates canonical records.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidationOptions,
    vocabularies: TransformOptions,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            vocabularies: TransformOptions::default(),
        }
    }

    /// Use the vocabularies of the import's transform options for
    /// "did you mean" suggestions.
    #[must_use]
    pub fn with_vocabularies(mut self, transform: TransformOptions) -> Self {
        self.vocabularies = transform;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Issues for one record, addressed to its source row.
    pub fn validate_record(&self, record: &CanonicalRecord) -> Vec<ValidationIssue> {
        check_record(record, &self.options, &self.vocabularies)
            .iter()
            .map(|issue| ValidationIssue::from_issue(record.row_number, issue))
            .collect()
    }

    /// Validate all records, calling `progress` after every chunk.
    ///
    /// Returning [`ControlFlow::Break`] stops before the next chunk; a
    /// chunk is never interrupted mid-row.
    pub fn validate_batch_with_progress<F>(
        &self,
        records: &[CanonicalRecord],
        mut progress: F,
    ) -> BatchValidation
    where
        F: FnMut(Progress) -> ControlFlow<()>,
    {
        let total = records.len();
        let chunk_size = self.options.effective_progress_interval();
        let mut result = BatchValidation::default();

        for chunk in records.chunks(chunk_size) {
            for record in chunk {
                let issues = self.validate_record(record);
                let worst = issues.iter().map(|i| i.severity).min();
                result.stats.record(worst);
                result.issues.extend(issues);
            }
            let processed = result.stats.total_rows;
            debug!(processed, total, "validation progress");
            if progress(Progress { processed, total }).is_break() && processed < total {
                result.cancelled = true;
                break;
            }
        }

        info!(
            total = result.stats.total_rows,
            valid = result.stats.valid_rows,
            warnings = result.stats.warning_rows,
            errors = result.stats.error_rows,
            cancelled = result.cancelled,
            "validated batch"
        );
        result
    }

    /// Validate all records without progress reporting.
    pub fn validate_batch(&self, records: &[CanonicalRecord]) -> BatchValidation {
        self.validate_batch_with_progress(records, |_| ControlFlow::Continue(()))
    }
}

/// Validate records with the given options and default vocabularies.
pub fn validate_batch(records: &[CanonicalRecord], options: &ValidationOptions) -> BatchValidation {
    Validator::new(options.clone()).validate_batch(records)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn named(row: usize) -> CanonicalRecord {
        let mut record = CanonicalRecord::new(row);
        record.last_name = Some(format!("Muster{row}"));
        record
    }

    #[test]
    fn test_rows_are_bucketed_by_worst_issue() {
        let clean = named(1);
        let mut warning = named(2);
        warning.postal_code = Some("1010".to_string());
        let mut error = named(3);
        error.email = Some("broken".to_string());
        error.postal_code = Some("1010".to_string());
        let mut info = named(4);
        info.phone = Some(intake_model::PhoneNumber::passthrough("1234567"));

        let options = ValidationOptions::default().with_today(today());
        let result = validate_batch(&[clean, warning, error, info], &options);
        assert_eq!(
            result.stats,
            BatchStats {
                total_rows: 4,
                valid_rows: 2,
                warning_rows: 1,
                error_rows: 1,
            }
        );
        assert!(!result.stats.is_valid());
        assert_eq!(result.count(Severity::Info), 1);
        assert_eq!(result.issues_for_row(3).count(), 2);
    }

    #[test]
    fn test_progress_and_cancellation() {
        let records: Vec<CanonicalRecord> = (1..=250).map(named).collect();
        let validator = Validator::new(
            ValidationOptions::default()
                .with_today(today())
                .with_progress_interval(100),
        );

        let mut seen = Vec::new();
        let result = validator.validate_batch_with_progress(&records, |p| {
            seen.push(p.processed);
            ControlFlow::Continue(())
        });
        assert_eq!(seen, vec![100, 200, 250]);
        assert!(!result.cancelled);
        assert_eq!(result.stats.total_rows, 250);

        let result = validator.validate_batch_with_progress(&records, |_| ControlFlow::Break(()));
        assert!(result.cancelled);
        assert_eq!(result.stats.total_rows, 100);
        assert_eq!(result.stats.valid_rows, 100);
    }

    #[test]
    fn test_empty_batch() {
        let result = Validator::default().validate_batch(&[]);
        assert_eq!(result.stats, BatchStats::default());
        assert!(result.stats.is_valid());
        assert!(!result.cancelled);
    }
}
