use std::path::PathBuf;

use intake_core::ImportOutcome;
use intake_map::MappingResult;
use intake_validate::{Severity, ValidationIssue};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RunResult {
    pub input: PathBuf,
    /// Headers after encoding repair.
    pub headers: Vec<String>,
    pub mapping: MappingResult,
    pub outcome: ImportOutcome,
    /// Suggestions left unapplied because they needed confirmation.
    pub dropped_suggestions: usize,
    #[serde(skip)]
    pub output: Option<PathBuf>,
}

impl RunResult {
    /// True when any issue is at least as severe as `threshold`.
    pub fn fails(&self, threshold: Severity) -> bool {
        reaches(&self.outcome.validation.issues, threshold)
    }
}

fn reaches(issues: &[ValidationIssue], threshold: Severity) -> bool {
    issues.iter().any(|issue| issue.severity <= threshold)
}

#[cfg(test)]
mod tests {
    use intake_validate::Category;

    use super::*;

    fn issue(severity: Severity) -> ValidationIssue {
        ValidationIssue {
            severity,
            category: Category::Terminology,
            row: 1,
            field: None,
            code: "gender.unrecognized".to_string(),
            message: String::new(),
            suggestion: None,
        }
    }

    #[test]
    fn test_fail_threshold_includes_more_severe_issues() {
        let warnings = [issue(Severity::Warning)];
        assert!(!reaches(&warnings, Severity::Error));
        assert!(reaches(&warnings, Severity::Warning));
        assert!(reaches(&warnings, Severity::Info));

        let errors = [issue(Severity::Info), issue(Severity::Error)];
        assert!(reaches(&errors, Severity::Error));
        assert!(!reaches(&[], Severity::Info));
    }
}
