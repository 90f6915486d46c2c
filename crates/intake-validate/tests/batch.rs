use chrono::NaiveDate;
use intake_model::{CanonicalRecord, CodedValue};
use intake_validate::{Severity, ValidationOptions, Validator, validate_batch};
use proptest::prelude::*;

fn options() -> ValidationOptions {
    ValidationOptions::default().with_today(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
}

fn any_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of(
        (1890i32..2040, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
    )
}

fn any_record() -> impl Strategy<Value = CanonicalRecord> {
    (
        prop::option::of("[A-Z][a-z]{2,8}"),
        prop::option::of("[a-z.@]{1,12}"),
        prop::option::of("[0-9]{3,6}"),
        any_date(),
        any_date(),
        any_date(),
        prop::option::of(prop_oneof![Just("aktiv"), Just("sofort")]),
    )
        .prop_map(|(last, email, postal, birth, entry, exit, status)| {
            let mut record = CanonicalRecord::new(1);
            record.last_name = last;
            record.email = email;
            record.postal_code = postal;
            record.birth_date = birth;
            record.entry_date = entry;
            record.exit_date = exit;
            record.status = status.map(|s| {
                if s == "aktiv" {
                    CodedValue::known("active")
                } else {
                    CodedValue::unknown(s)
                }
            });
            record
        })
}

proptest! {
    #[test]
    fn stats_partition_all_rows(mut records in prop::collection::vec(any_record(), 0..40)) {
        for (index, record) in records.iter_mut().enumerate() {
            record.row_number = index + 1;
        }
        let result = validate_batch(&records, &options());
        let stats = result.stats;
        prop_assert_eq!(stats.total_rows, records.len());
        prop_assert_eq!(
            stats.valid_rows + stats.warning_rows + stats.error_rows,
            stats.total_rows
        );
        prop_assert_eq!(stats.is_valid(), stats.error_rows == 0);
        prop_assert_eq!(stats.is_valid(), result.count(Severity::Error) == 0);
        for issue in &result.issues {
            prop_assert!((1..=records.len()).contains(&issue.row));
            prop_assert!(!issue.message.is_empty());
        }
    }
}

#[test]
fn entry_after_exit_is_reported_with_row_and_suggestion() {
    let mut record = CanonicalRecord::new(7);
    record.first_name = Some("Erika".to_string());
    record.entry_date = NaiveDate::from_ymd_opt(2024, 12, 25);
    record.exit_date = NaiveDate::from_ymd_opt(2024, 1, 15);

    let result = Validator::new(options()).validate_batch(&[record]);
    assert_eq!(result.stats.error_rows, 1);
    let errors: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .collect();
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|i| i.code == "entry_date.after_exit"));
    assert!(errors.iter().all(|i| i.row == 7));
    assert!(errors.iter().all(|i| i.suggestion.is_some()));
}

#[test]
fn issues_serialize_to_json() {
    let mut record = CanonicalRecord::new(2);
    record.last_name = Some("Muster".to_string());
    record.email = Some("kein-at-zeichen".to_string());
    let result = validate_batch(&[record], &options());
    let json = serde_json::to_value(&result).expect("serialize batch");
    assert_eq!(json["stats"]["error_rows"], 1);
    assert_eq!(json["issues"][0]["severity"], "error");
    assert_eq!(json["issues"][0]["field"], "email");
    assert_eq!(json["issues"][0]["code"], "email.invalid");
}
