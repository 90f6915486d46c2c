//! Cross-field date plausibility.

use chrono::{Datelike, NaiveDate};
use intake_model::CanonicalRecord;

use crate::issue::Issue;
use crate::options::ValidationOptions;

/// Check birth, entry, exit and follow-up dates against each other and
/// against the reference date.
pub fn check(record: &CanonicalRecord, options: &ValidationOptions) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(birth_date) = record.birth_date {
        if birth_date > options.today {
            issues.push(Issue::BirthDateInFuture { birth_date });
        } else {
            let age = age_on(birth_date, options.today);
            let min = i32::try_from(options.min_age).unwrap_or(i32::MAX);
            let max = i32::try_from(options.max_age).unwrap_or(i32::MAX);
            if age < min || age > max {
                issues.push(Issue::ImplausibleAge {
                    age,
                    min: options.min_age,
                    max: options.max_age,
                });
            }
        }
    }

    if let (Some(entry_date), Some(exit_date)) = (record.entry_date, record.exit_date)
        && entry_date > exit_date
    {
        issues.push(Issue::EntryAfterExit {
            entry_date,
            exit_date,
        });
    }

    if let (Some(entry_date), Some(birth_date)) = (record.entry_date, record.birth_date)
        && entry_date < birth_date
    {
        issues.push(Issue::EntryBeforeBirth {
            entry_date,
            birth_date,
        });
    }

    if let Some(follow_up_date) = record.follow_up_date {
        let days_ago = (options.today - follow_up_date).num_days();
        if days_ago > options.follow_up_max_age_days {
            issues.push(Issue::StaleFollowUp {
                follow_up_date,
                days_ago,
            });
        }
    }

    issues
}

/// Completed years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn options() -> ValidationOptions {
        ValidationOptions::default().with_today(date(2025, 6, 1))
    }

    fn codes(record: &CanonicalRecord) -> Vec<&'static str> {
        check(record, &options()).iter().map(Issue::code).collect()
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        assert_eq!(age_on(date(2000, 6, 1), date(2025, 6, 1)), 25);
        assert_eq!(age_on(date(2000, 6, 2), date(2025, 6, 1)), 24);
    }

    #[test]
    fn test_entry_after_exit_is_an_error() {
        let mut record = CanonicalRecord::new(1);
        record.entry_date = Some(date(2024, 12, 25));
        record.exit_date = Some(date(2024, 1, 15));
        assert_eq!(codes(&record), vec!["entry_date.after_exit"]);
    }

    #[test]
    fn test_birth_date_rules() {
        let mut record = CanonicalRecord::new(1);
        record.birth_date = Some(date(2030, 1, 1));
        assert_eq!(codes(&record), vec!["birth_date.future"]);
        record.birth_date = Some(date(2015, 1, 1));
        assert_eq!(codes(&record), vec!["birth_date.age"]);
        record.birth_date = Some(date(1900, 1, 1));
        assert_eq!(codes(&record), vec!["birth_date.age"]);
        record.birth_date = Some(date(1980, 1, 1));
        assert!(codes(&record).is_empty());
        record.entry_date = Some(date(1979, 1, 1));
        assert_eq!(codes(&record), vec!["entry_date.before_birth"]);
    }

    #[test]
    fn test_stale_follow_up() {
        let mut record = CanonicalRecord::new(1);
        record.follow_up_date = Some(date(2024, 6, 1));
        assert!(codes(&record).is_empty());
        record.follow_up_date = Some(date(2024, 5, 31));
        assert_eq!(codes(&record), vec!["follow_up_date.stale"]);
    }
}
