//! Per-field format checks.

use std::sync::LazyLock;

use intake_model::{CanonicalField, CanonicalRecord};
use regex::Regex;

use super::iban::is_valid_iban;
use crate::issue::Issue;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// German social insurance number: area, birth date DDMMYY, letter, serial.
static NATIONAL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}[0-3]\d[01]\d\d{2}[A-Z]\d{3}$").expect("valid national id regex")
});

const MIN_PHONE_DIGITS: usize = 6;
const MAX_PHONE_DIGITS: usize = 15;

/// Country names and codes where four-digit postal codes are normal.
const FOUR_DIGIT_POSTAL_COUNTRIES: &[&str] = &[
    "at",
    "aut",
    "austria",
    "österreich",
    "oesterreich",
    "ch",
    "che",
    "schweiz",
    "switzerland",
    "suisse",
    "svizzera",
];

/// Check names, unparsed values and value formats of one record.
pub fn check(record: &CanonicalRecord) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_names(record, &mut issues);
    check_unparsed(record, &mut issues);
    check_email(record, &mut issues);
    check_phones(record, &mut issues);
    check_postal_code(record, &mut issues);
    check_identifiers(record, &mut issues);
    issues
}

fn check_names(record: &CanonicalRecord, issues: &mut Vec<Issue>) {
    if record.name_placeholder {
        issues.push(Issue::PlaceholderName {
            placeholder: record.last_name.clone().unwrap_or_default(),
        });
    } else if record.first_name.is_none() && record.last_name.is_none() {
        issues.push(Issue::MissingName);
    }
}

fn check_unparsed(record: &CanonicalRecord, issues: &mut Vec<Issue>) {
    for (field, value) in &record.unparsed {
        if field.is_date() {
            issues.push(Issue::InvalidDate {
                field: *field,
                value: value.clone(),
            });
        } else if *field == CanonicalField::Gender {
            issues.push(Issue::UnrecognizedGender {
                value: value.clone(),
            });
        }
    }
}

fn check_email(record: &CanonicalRecord, issues: &mut Vec<Issue>) {
    if let Some(email) = &record.email
        && !EMAIL.is_match(email)
    {
        issues.push(Issue::InvalidEmail {
            value: email.clone(),
        });
    }
}

fn check_phones(record: &CanonicalRecord, issues: &mut Vec<Issue>) {
    for field in [
        CanonicalField::Phone,
        CanonicalField::Mobile,
        CanonicalField::Fax,
    ] {
        let Some(phone) = record.phone(field) else {
            continue;
        };
        let digits = phone.digit_count();
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
            issues.push(Issue::InvalidPhone {
                field,
                value: phone.raw.clone(),
                digits,
            });
        } else if !phone.is_decomposed() {
            issues.push(Issue::PhoneNotDecomposed {
                field,
                value: phone.raw.clone(),
            });
        }
    }
}

fn check_postal_code(record: &CanonicalRecord, issues: &mut Vec<Issue>) {
    let Some(code) = &record.postal_code else {
        return;
    };
    let all_digits = code.chars().all(|c| c.is_ascii_digit());
    match code.len() {
        5 if all_digits => {}
        4 if all_digits => {
            if !has_four_digit_postal_country(record) {
                issues.push(Issue::ShortPostalCode {
                    value: code.clone(),
                });
            }
        }
        _ => issues.push(Issue::InvalidPostalCode {
            value: code.clone(),
        }),
    }
}

fn has_four_digit_postal_country(record: &CanonicalRecord) -> bool {
    record.country.as_deref().is_some_and(|country| {
        let country = country.trim().to_lowercase();
        FOUR_DIGIT_POSTAL_COUNTRIES.contains(&country.as_str())
    })
}

fn check_identifiers(record: &CanonicalRecord, issues: &mut Vec<Issue>) {
    if let Some(tax_id) = &record.tax_id
        && !(tax_id.len() == 11 && tax_id.chars().all(|c| c.is_ascii_digit()))
    {
        issues.push(Issue::InvalidTaxId {
            value: tax_id.clone(),
        });
    }
    if let Some(national_id) = &record.national_id
        && !NATIONAL_ID.is_match(national_id)
    {
        issues.push(Issue::NationalIdPattern {
            value: national_id.clone(),
        });
    }
    if let Some(iban) = &record.iban
        && !is_valid_iban(iban)
    {
        issues.push(Issue::InvalidIban {
            value: iban.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use intake_model::PhoneNumber;

    use super::*;

    fn named() -> CanonicalRecord {
        let mut record = CanonicalRecord::new(1);
        record.last_name = Some("Muster".to_string());
        record
    }

    fn codes(issues: &[Issue]) -> Vec<&'static str> {
        issues.iter().map(Issue::code).collect()
    }

    #[test]
    fn test_clean_record_has_no_issues() {
        let mut record = named();
        record.email = Some("max@example.org".to_string());
        record.postal_code = Some("10115".to_string());
        record.tax_id = Some("12345678901".to_string());
        record.national_id = Some("65170839J003".to_string());
        record.iban = Some("DE89370400440532013000".to_string());
        assert!(check(&record).is_empty());
    }

    #[test]
    fn test_names() {
        let mut record = CanonicalRecord::new(2);
        assert_eq!(codes(&check(&record)), vec!["name.missing"]);
        record.last_name = Some("Unbekannt-2".to_string());
        record.name_placeholder = true;
        assert_eq!(codes(&check(&record)), vec!["name.placeholder"]);
    }

    #[test]
    fn test_unparsed_values() {
        let mut record = named();
        record
            .unparsed
            .insert(CanonicalField::BirthDate, "32.13.1990".to_string());
        record
            .unparsed
            .insert(CanonicalField::Gender, "?".to_string());
        assert_eq!(
            codes(&check(&record)),
            vec!["date.invalid", "gender.unrecognized"]
        );
    }

    #[test]
    fn test_email_and_phone_formats() {
        let mut record = named();
        record.email = Some("max.example.org".to_string());
        record.phone = Some(PhoneNumber::passthrough("123"));
        record.mobile = Some(PhoneNumber::passthrough("1234567"));
        assert_eq!(
            codes(&check(&record)),
            vec!["email.invalid", "phone.invalid", "phone.undecomposed"]
        );
    }

    #[test]
    fn test_postal_codes_by_digit_count() {
        let mut record = named();
        record.postal_code = Some("1010".to_string());
        assert_eq!(codes(&check(&record)), vec!["postal_code.short"]);
        record.country = Some("Österreich".to_string());
        assert!(check(&record).is_empty());
        record.postal_code = Some("1O115".to_string());
        assert_eq!(codes(&check(&record)), vec!["postal_code.invalid"]);
    }

    #[test]
    fn test_identifier_formats() {
        let mut record = named();
        record.tax_id = Some("1234567890".to_string());
        record.national_id = Some("12345".to_string());
        record.iban = Some("DE89370400440532013001".to_string());
        assert_eq!(
            codes(&check(&record)),
            vec!["tax_id.invalid", "national_id.pattern", "iban.invalid"]
        );
    }
}
