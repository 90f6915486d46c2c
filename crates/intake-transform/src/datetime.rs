//! Date parsing for imported values.
//!
//! Accepts ISO 8601, German and US numeric forms, written month names in
//! German or English, compact `YYYYMMDD` and spreadsheet serial numbers.
//! Ambiguous day/month numbers are resolved by [`DateOrder`]. Anything that
//! cannot be read as a calendar date yields `None`.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate, NaiveDateTime};
use intake_model::DateOrder;
use regex::Regex;

/// `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYY.MM.DD`, optionally followed by a
/// time with seconds, fraction and UTC offset.
static ISO_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:[ T]\d{1,2}:\d{2}(?::\d{2}(?:[.,]\d+)?)?\s?(?:Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .expect("valid iso date regex")
});

/// `DD.MM.YYYY`, `MM/DD/YY` and friends, optionally followed by a time.
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{2}|\d{4})(?:[ T,]+\d{1,2}:\d{2}(?::\d{2})?)?$")
        .expect("valid numeric date regex")
});

/// `15. Januar 2024`, `15-Jan-2024`, `3 Mar 24`.
static DAY_MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\.?[ -]?(\p{L}{3,})\.?[ -]?(\d{2}|\d{4})$")
        .expect("valid day-month-name regex")
});

/// `January 15, 2024`, `Jan 15 2024`.
static MONTH_NAME_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\p{L}{3,})\.? (\d{1,2}),? (\d{4})$").expect("valid month-name-day regex")
});

/// Spreadsheet serial day numbers, optionally with a time fraction.
static SERIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5})(?:\.\d+)?$").expect("valid serial date regex"));

/// Years below this two-digit value belong to the 2000s.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 50;

/// Parse an imported date value.
pub fn parse_date(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_LIKE.captures(trimmed) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = NUMERIC.captures(trimmed) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3])?;
        let (day, month) = resolve_day_month(first, second, order)?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DAY_MONTH_NAME.captures(trimmed) {
        let day = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2])?;
        let year = parse_year(&caps[3])?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = MONTH_NAME_DAY.captures(trimmed) {
        let month = month_from_name(&caps[1])?;
        let day = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if trimmed.len() == 8
        && trimmed.bytes().all(|b| b.is_ascii_digit())
        && let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y%m%d")
    {
        return Some(date);
    }

    if let Some(caps) = SERIAL.captures(trimmed) {
        let serial: u64 = caps[1].parse().ok()?;
        return from_serial(serial);
    }

    try_parse_datetime(trimmed).map(|dt| dt.date())
}

/// Decide which of two numbers is the day and which the month.
///
/// A number above 12 can only be a day. When both fit either role the
/// preferred order applies. Returns `(day, month)`.
pub fn resolve_day_month(first: u32, second: u32, order: DateOrder) -> Option<(u32, u32)> {
    match (first > 12, second > 12) {
        (true, true) => None,
        (false, true) => Some((second, first)),
        (true, false) => Some((first, second)),
        (false, false) => match order {
            DateOrder::DayFirst => Some((first, second)),
            DateOrder::MonthFirst => Some((second, first)),
        },
    }
}

/// Expand a two-digit year around [`TWO_DIGIT_YEAR_PIVOT`].
pub fn expand_two_digit_year(year: i32) -> i32 {
    if year < TWO_DIGIT_YEAR_PIVOT {
        2000 + year
    } else {
        1900 + year
    }
}

/// Convert a spreadsheet serial day number (1900 date system).
pub fn from_serial(serial: u64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial))
}

/// Format a date as ISO 8601 (`YYYY-MM-DD`).
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_year(text: &str) -> Option<i32> {
    let year: i32 = text.parse().ok()?;
    match text.len() {
        2 => Some(expand_two_digit_year(year)),
        4 => Some(year),
        _ => None,
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mär" | "mae" | "mar" | "mrz" => 3,
        "apr" => 4,
        "mai" | "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "okt" | "oct" => 10,
        "nov" => 11,
        "dez" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%d.%m.%Y %H:%M:%S",
        "%d.%m.%Y %H:%M",
    ];
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_and_german_forms() {
        assert_eq!(parse_date("2024-01-15", DateOrder::DayFirst), ymd(2024, 1, 15));
        assert_eq!(
            parse_date("2024-01-15T10:30:00", DateOrder::DayFirst),
            ymd(2024, 1, 15)
        );
        assert_eq!(parse_date("15.01.2024", DateOrder::DayFirst), ymd(2024, 1, 15));
        assert_eq!(parse_date(" 1.2.1980 ", DateOrder::DayFirst), ymd(1980, 2, 1));
        assert_eq!(
            parse_date("15.01.2024 08:15", DateOrder::DayFirst),
            ymd(2024, 1, 15)
        );
    }

    #[test]
    fn test_ambiguous_dates_follow_order() {
        assert_eq!(parse_date("03/04/2024", DateOrder::DayFirst), ymd(2024, 4, 3));
        assert_eq!(parse_date("03/04/2024", DateOrder::MonthFirst), ymd(2024, 3, 4));
    }

    #[test]
    fn test_number_above_twelve_is_the_day() {
        assert_eq!(parse_date("04/13/2024", DateOrder::DayFirst), ymd(2024, 4, 13));
        assert_eq!(parse_date("13/04/2024", DateOrder::MonthFirst), ymd(2024, 4, 13));
        assert_eq!(parse_date("13/14/2024", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_two_digit_years_pivot() {
        assert_eq!(parse_date("01.02.85", DateOrder::DayFirst), ymd(1985, 2, 1));
        assert_eq!(parse_date("01.02.25", DateOrder::DayFirst), ymd(2025, 2, 1));
        assert_eq!(expand_two_digit_year(49), 2049);
        assert_eq!(expand_two_digit_year(50), 1950);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(
            parse_date("15. Januar 2024", DateOrder::DayFirst),
            ymd(2024, 1, 15)
        );
        assert_eq!(parse_date("3. März 2023", DateOrder::DayFirst), ymd(2023, 3, 3));
        assert_eq!(parse_date("15-Jan-2024", DateOrder::DayFirst), ymd(2024, 1, 15));
        assert_eq!(
            parse_date("January 15, 2024", DateOrder::DayFirst),
            ymd(2024, 1, 15)
        );
        assert_eq!(parse_date("15. Foo 2024", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_compact_and_serial() {
        assert_eq!(parse_date("20240115", DateOrder::DayFirst), ymd(2024, 1, 15));
        assert_eq!(parse_date("45292", DateOrder::DayFirst), ymd(2024, 1, 1));
        assert_eq!(parse_date("45292.75", DateOrder::DayFirst), ymd(2024, 1, 1));
    }

    #[test]
    fn test_invalid_values_yield_none() {
        assert_eq!(parse_date("", DateOrder::DayFirst), None);
        assert_eq!(parse_date("unbekannt", DateOrder::DayFirst), None);
        assert_eq!(parse_date("31.02.2024", DateOrder::DayFirst), None);
        assert_eq!(parse_date("1.2.123", DateOrder::DayFirst), None);
        assert_eq!(parse_date("2024-13-01", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_iso_date_accepts_only_a_time_suffix() {
        assert_eq!(parse_date("2024-01-15 garbage", DateOrder::DayFirst), None);
        assert_eq!(parse_date("2024-01-15T", DateOrder::DayFirst), None);
        assert_eq!(parse_date("2024-01-15 12", DateOrder::DayFirst), None);
        assert_eq!(
            parse_date("2024-01-15 08:00", DateOrder::DayFirst),
            ymd(2024, 1, 15)
        );
        assert_eq!(
            parse_date("2024/01/15 08:00:30.250", DateOrder::DayFirst),
            ymd(2024, 1, 15)
        );
        assert_eq!(
            parse_date("2024-01-15T10:30:00+01:00", DateOrder::DayFirst),
            ymd(2024, 1, 15)
        );
        assert_eq!(
            parse_date("2024-01-15T10:30:00Z", DateOrder::DayFirst),
            ymd(2024, 1, 15)
        );
    }

    #[test]
    fn test_format_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_iso_date(date), "2024-01-05");
    }
}
