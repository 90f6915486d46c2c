//! Content detection: classify sample values into pattern families.

use std::sync::LazyLock;

use intake_model::{CanonicalField, ContentType};
use regex::Regex;
use serde::Serialize;

/// Samples inspected per column unless configured otherwise.
pub const DEFAULT_SAMPLE_LIMIT: usize = 20;

/// Minimum share of matching samples for a content type to be reported.
pub const REPORT_THRESHOLD: f64 = 0.3;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{4}-(?:0?[1-9]|1[0-2])-(?:0?[1-9]|[12]\d|3[01])(?:[T ]\d{1,2}:\d{2}(?::\d{2})?)?$",
    )
    .expect("valid ISO date regex")
});

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[./-](\d{1,2})[./-](?:\d{2}|\d{4})$").expect("valid numeric date regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+|00|0)\d[\d ()/.-]*$").expect("valid phone regex"));

static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z]{1,2}-)?\d{4,5}$").expect("valid postal code regex"));

/// Social insurance number (`12 345678 A 123`) or 11-digit tax id.
static ID_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{2}\s?\d{6}\s?[A-Z]\s?\d{3}|[1-9]\d(?:\s?\d{3}){3})$")
        .expect("valid id number regex")
});

static IBAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{2}[A-Z0-9]{11,30}$").expect("valid IBAN regex"));

/// One capitalized name part: "Meier", "O'Brien", "McDonald", "D'arcy".
const NAME_PART: &str = r"\p{Lu}(?:\p{Ll}+|\p{Ll}*['’]?\p{Lu}\p{Ll}+|['’]\p{Ll}+)";

static PERSON_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{NAME_PART}(?:[ -]{NAME_PART}){{0,2}}$")).expect("valid name regex")
});

/// Street followed by a house number, optionally with suffix or range.
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\d,]*\p{L}[^\d,]*\s\d{1,4}\s?[a-zA-Z]?(?:\s?[-/]\s?\d{1,4}[a-zA-Z]?)?$")
        .expect("valid address regex")
});

const GENDER_TOKENS: &[&str] = &[
    "m", "w", "f", "d", "x", "männlich", "maennlich", "weiblich", "divers", "male", "female",
    "diverse", "mann", "frau",
];

/// Share of a column's samples that look like one content type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContentHint {
    pub content: ContentType,
    /// `matches / samples`.
    pub confidence: f64,
    pub matches: usize,
    /// Non-empty samples inspected.
    pub samples: usize,
}

/// Content types a single value matches. A value may match several.
pub fn classify_value(value: &str) -> Vec<ContentType> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }
    ContentType::all()
        .iter()
        .copied()
        .filter(|content| matches_content(*content, value))
        .collect()
}

/// True when `value` (already trimmed) belongs to `content`.
pub fn matches_content(content: ContentType, value: &str) -> bool {
    match content {
        ContentType::Date => is_date_like(value),
        ContentType::Email => EMAIL.is_match(value),
        ContentType::Phone => {
            let digits = value.chars().filter(char::is_ascii_digit).count();
            PHONE.is_match(value) && (6..=15).contains(&digits) && !is_date_like(value)
        }
        ContentType::PostalCode => POSTAL_CODE.is_match(value),
        ContentType::IdNumber => ID_NUMBER.is_match(value),
        ContentType::Iban => {
            let compact: String = value
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase();
            IBAN.is_match(&compact)
        }
        ContentType::PersonName => PERSON_NAME.is_match(value),
        ContentType::Address => ADDRESS.is_match(value),
        ContentType::Gender => GENDER_TOKENS.contains(&value.to_lowercase().as_str()),
    }
}

fn is_date_like(value: &str) -> bool {
    if ISO_DATE.is_match(value) {
        return true;
    }
    let Some(caps) = NUMERIC_DATE.captures(value) else {
        return false;
    };
    let first: u32 = caps[1].parse().unwrap_or(0);
    let second: u32 = caps[2].parse().unwrap_or(0);
    let in_day_range = |n: u32| (1..=31).contains(&n);
    let in_month_range = |n: u32| (1..=12).contains(&n);
    in_day_range(first)
        && in_day_range(second)
        && (in_month_range(first) || in_month_range(second))
}

/// Classifies up to `limit` non-empty samples and reports every content type
/// matched by at least [`REPORT_THRESHOLD`] of them, strongest first.
pub fn detect_content<S: AsRef<str>>(samples: &[S], limit: usize) -> Vec<ContentHint> {
    let values: Vec<&str> = samples
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .take(limit)
        .collect();
    if values.is_empty() {
        return Vec::new();
    }
    let total = values.len();
    let mut hints: Vec<ContentHint> = ContentType::all()
        .iter()
        .filter_map(|content| {
            let matches = values
                .iter()
                .filter(|v| matches_content(*content, v))
                .count();
            let confidence = matches as f64 / total as f64;
            (matches > 0 && confidence >= REPORT_THRESHOLD).then_some(ContentHint {
                content: *content,
                confidence,
                matches,
                samples: total,
            })
        })
        .collect();
    hints.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then(a.content.cmp(&b.content))
    });
    hints
}

/// Fields suggested purely from content, for headers that carry no signal.
pub fn suggest_fields(hints: &[ContentHint]) -> Vec<(CanonicalField, f64)> {
    let mut out: Vec<(CanonicalField, f64)> = hints
        .iter()
        .flat_map(|hint| {
            CanonicalField::all()
                .iter()
                .filter(move |field| field.expected_content() == Some(hint.content))
                .map(move |field| (*field, hint.confidence))
        })
        .collect();
    out.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then(a.0.priority().cmp(&b.0.priority()))
    });
    out
}
