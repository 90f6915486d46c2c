//! Validation issue types.
//!
//! The [`Issue`] enum carries only the data each finding needs; it is
//! rendered into a row-addressed [`ValidationIssue`] for callers.

use chrono::NaiveDate;
use intake_model::CanonicalField;
use serde::{Deserialize, Serialize};

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed; the row is not counted as valid.
    Error,
    /// Should be reviewed.
    Warning,
    /// Informational only.
    Info,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

/// Group of related checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Presence,
    Format,
    Terminology,
    Consistency,
}

impl Category {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Presence,
            Self::Format,
            Self::Terminology,
            Self::Consistency,
        ]
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Presence => "Presence",
            Self::Format => "Format",
            Self::Terminology => "Terminology",
            Self::Consistency => "Consistency",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Presence => "Required name fields",
            Self::Format => "Value formats and checksums",
            Self::Terminology => "Known values of enumerated fields",
            Self::Consistency => "Cross-field date plausibility",
        }
    }
}

/// A single finding on one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Issue {
    // Presence checks
    /// Neither first nor last name is set.
    MissingName,
    /// The last name is a generated placeholder.
    PlaceholderName { placeholder: String },

    // Format checks
    /// A date field held text that is not a date.
    InvalidDate { field: CanonicalField, value: String },
    /// A gender value matched no known token.
    UnrecognizedGender { value: String },
    InvalidEmail { value: String },
    /// Digit count outside the plausible range.
    InvalidPhone {
        field: CanonicalField,
        value: String,
        digits: usize,
    },
    /// No country or area prefix could be recognized.
    PhoneNotDecomposed { field: CanonicalField, value: String },
    InvalidPostalCode { value: String },
    /// Four digits without an Austrian or Swiss address.
    ShortPostalCode { value: String },
    InvalidTaxId { value: String },
    /// Does not look like a social insurance number.
    NationalIdPattern { value: String },
    InvalidIban { value: String },

    // Terminology checks
    /// Value outside the field's vocabulary.
    UnknownValue {
        field: CanonicalField,
        value: String,
        nearest: Option<String>,
        allowed: Vec<String>,
    },

    // Consistency checks
    BirthDateInFuture { birth_date: NaiveDate },
    ImplausibleAge { age: i32, min: u32, max: u32 },
    EntryAfterExit {
        entry_date: NaiveDate,
        exit_date: NaiveDate,
    },
    EntryBeforeBirth {
        entry_date: NaiveDate,
        birth_date: NaiveDate,
    },
    /// Follow-up date lies too far in the past.
    StaleFollowUp {
        follow_up_date: NaiveDate,
        days_ago: i64,
    },
}

impl Issue {
    /// Stable issue code.
    pub fn code(&self) -> &'static str {
        match self {
            Issue::MissingName => "name.missing",
            Issue::PlaceholderName { .. } => "name.placeholder",
            Issue::InvalidDate { .. } => "date.invalid",
            Issue::UnrecognizedGender { .. } => "gender.unrecognized",
            Issue::InvalidEmail { .. } => "email.invalid",
            Issue::InvalidPhone { .. } => "phone.invalid",
            Issue::PhoneNotDecomposed { .. } => "phone.undecomposed",
            Issue::InvalidPostalCode { .. } => "postal_code.invalid",
            Issue::ShortPostalCode { .. } => "postal_code.short",
            Issue::InvalidTaxId { .. } => "tax_id.invalid",
            Issue::NationalIdPattern { .. } => "national_id.pattern",
            Issue::InvalidIban { .. } => "iban.invalid",
            Issue::UnknownValue { .. } => "value.unknown",
            Issue::BirthDateInFuture { .. } => "birth_date.future",
            Issue::ImplausibleAge { .. } => "birth_date.age",
            Issue::EntryAfterExit { .. } => "entry_date.after_exit",
            Issue::EntryBeforeBirth { .. } => "entry_date.before_birth",
            Issue::StaleFollowUp { .. } => "follow_up_date.stale",
        }
    }

    /// Field the issue is reported against.
    pub fn field(&self) -> CanonicalField {
        match self {
            Issue::MissingName | Issue::PlaceholderName { .. } => CanonicalField::LastName,
            Issue::InvalidDate { field, .. }
            | Issue::InvalidPhone { field, .. }
            | Issue::PhoneNotDecomposed { field, .. }
            | Issue::UnknownValue { field, .. } => *field,
            Issue::UnrecognizedGender { .. } => CanonicalField::Gender,
            Issue::InvalidEmail { .. } => CanonicalField::Email,
            Issue::InvalidPostalCode { .. } | Issue::ShortPostalCode { .. } => {
                CanonicalField::PostalCode
            }
            Issue::InvalidTaxId { .. } => CanonicalField::TaxId,
            Issue::NationalIdPattern { .. } => CanonicalField::NationalId,
            Issue::InvalidIban { .. } => CanonicalField::Iban,
            Issue::BirthDateInFuture { .. } | Issue::ImplausibleAge { .. } => {
                CanonicalField::BirthDate
            }
            Issue::EntryAfterExit { .. } | Issue::EntryBeforeBirth { .. } => {
                CanonicalField::EntryDate
            }
            Issue::StaleFollowUp { .. } => CanonicalField::FollowUpDate,
        }
    }

    /// Category for this issue type.
    pub fn category(&self) -> Category {
        match self {
            Issue::MissingName | Issue::PlaceholderName { .. } => Category::Presence,
            Issue::UnknownValue { .. } => Category::Terminology,
            Issue::BirthDateInFuture { .. }
            | Issue::ImplausibleAge { .. }
            | Issue::EntryAfterExit { .. }
            | Issue::EntryBeforeBirth { .. }
            | Issue::StaleFollowUp { .. } => Category::Consistency,
            _ => Category::Format,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Issue::UnrecognizedGender { .. }
            | Issue::ShortPostalCode { .. }
            | Issue::NationalIdPattern { .. }
            | Issue::UnknownValue { .. }
            | Issue::ImplausibleAge { .. }
            | Issue::StaleFollowUp { .. } => Severity::Warning,
            Issue::PhoneNotDecomposed { .. } => Severity::Info,
            _ => Severity::Error,
        }
    }

    /// Format message with issue-specific data.
    pub fn message(&self) -> String {
        match self {
            Issue::MissingName => "Neither first nor last name is set".to_string(),
            Issue::PlaceholderName { placeholder } => {
                format!("Name missing; placeholder '{placeholder}' was assigned")
            }
            Issue::InvalidDate { field, value } => {
                format!("{} '{value}' is not a valid date", field.label())
            }
            Issue::UnrecognizedGender { value } => {
                format!("Gender '{value}' is not recognized")
            }
            Issue::InvalidEmail { value } => format!("Email '{value}' is not a valid address"),
            Issue::InvalidPhone {
                field,
                value,
                digits,
            } => format!("{} '{value}' has {digits} digits", field.label()),
            Issue::PhoneNotDecomposed { field, value } => format!(
                "{} '{value}' has no recognizable country or area code",
                field.label()
            ),
            Issue::InvalidPostalCode { value } => {
                format!("Postal code '{value}' must have 5 digits")
            }
            Issue::ShortPostalCode { value } => {
                format!("Postal code '{value}' has only 4 digits")
            }
            Issue::InvalidTaxId { value } => format!("Tax ID '{value}' must have 11 digits"),
            Issue::NationalIdPattern { value } => {
                format!("Social insurance number '{value}' does not match the expected pattern")
            }
            Issue::InvalidIban { value } => format!("IBAN '{value}' fails the checksum"),
            Issue::UnknownValue { field, value, .. } => {
                format!("{} '{value}' is not a known value", field.label())
            }
            Issue::BirthDateInFuture { birth_date } => {
                format!("Birth date {birth_date} lies in the future")
            }
            Issue::ImplausibleAge { age, min, max } => {
                format!("Age {age} is outside the plausible range {min}-{max}")
            }
            Issue::EntryAfterExit {
                entry_date,
                exit_date,
            } => format!("Entry date {entry_date} is after exit date {exit_date}"),
            Issue::EntryBeforeBirth {
                entry_date,
                birth_date,
            } => format!("Entry date {entry_date} is before birth date {birth_date}"),
            Issue::StaleFollowUp {
                follow_up_date,
                days_ago,
            } => format!("Follow-up date {follow_up_date} is {days_ago} days in the past"),
        }
    }

    /// Hint for fixing the value, if one applies.
    pub fn suggestion(&self) -> Option<String> {
        let text = match self {
            Issue::MissingName => "Map a first or last name column".to_string(),
            Issue::PlaceholderName { .. } => {
                "Replace the placeholder with the person's name".to_string()
            }
            Issue::InvalidDate { .. } => "Use DD.MM.YYYY or YYYY-MM-DD".to_string(),
            Issue::UnrecognizedGender { .. } => "Use m, w or d".to_string(),
            Issue::InvalidEmail { .. } => "Check for a missing @ or domain".to_string(),
            Issue::InvalidPhone { .. } => "Phone numbers have 6 to 15 digits".to_string(),
            Issue::PhoneNotDecomposed { .. } => {
                "Add a country code (+49) or an area code with leading 0".to_string()
            }
            Issue::InvalidPostalCode { .. } => "Check the postal code".to_string(),
            Issue::ShortPostalCode { value } => {
                format!("If this is a German postal code, use 0{value}")
            }
            Issue::InvalidTaxId { .. } => "Check the tax ID for missing digits".to_string(),
            Issue::NationalIdPattern { .. } => {
                "Expected 2 digits, birth date DDMMYY, a letter and 3 digits".to_string()
            }
            Issue::InvalidIban { .. } => "Check the IBAN for typos".to_string(),
            Issue::UnknownValue {
                nearest, allowed, ..
            } => match nearest {
                Some(value) => format!("Did you mean '{value}'?"),
                None if allowed.is_empty() => return None,
                None => format!("Use one of: {}", allowed.join(", ")),
            },
            Issue::BirthDateInFuture { .. } | Issue::ImplausibleAge { .. } => {
                "Check the birth date".to_string()
            }
            Issue::EntryAfterExit { .. } => "Swap or correct entry and exit dates".to_string(),
            Issue::EntryBeforeBirth { .. } => "Check entry and birth dates".to_string(),
            Issue::StaleFollowUp { .. } => "Schedule a new follow-up".to_string(),
        };
        Some(text)
    }
}

/// A finding addressed to a source row, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub category: Category,
    /// 1-based source row.
    pub row: usize,
    pub field: Option<CanonicalField>,
    pub code: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn from_issue(row: usize, issue: &Issue) -> Self {
        Self {
            severity: issue.severity(),
            category: issue.category(),
            row,
            field: Some(issue.field()),
            code: issue.code().to_string(),
            message: issue.message(),
            suggestion: issue.suggestion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse(" Warning "), Some(Severity::Warning));
        assert_eq!(Severity::parse("warn"), Some(Severity::Warning));
        assert_eq!(Severity::parse("fatal"), None);
        assert!(Severity::Error < Severity::Warning);
    }

    #[test]
    fn test_unknown_value_suggestion() {
        let issue = Issue::UnknownValue {
            field: CanonicalField::Status,
            value: "aktif".to_string(),
            nearest: Some("active".to_string()),
            allowed: vec!["active".to_string(), "inactive".to_string()],
        };
        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(issue.category(), Category::Terminology);
        insta::assert_snapshot!(issue.suggestion().unwrap(), @"Did you mean 'active'?");

        let issue = Issue::UnknownValue {
            field: CanonicalField::Status,
            value: "xyz".to_string(),
            nearest: None,
            allowed: vec!["active".to_string(), "inactive".to_string()],
        };
        insta::assert_snapshot!(issue.suggestion().unwrap(), @"Use one of: active, inactive");
    }

    #[test]
    fn test_validation_issue_from_entry_after_exit() {
        let issue = Issue::EntryAfterExit {
            entry_date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        let rendered = ValidationIssue::from_issue(3, &issue);
        assert_eq!(rendered.row, 3);
        assert_eq!(rendered.severity, Severity::Error);
        assert_eq!(rendered.field, Some(CanonicalField::EntryDate));
        insta::assert_snapshot!(
            rendered.message,
            @"Entry date 2024-12-25 is after exit date 2024-01-15"
        );
    }
}
