//! Vocabulary membership of enumerated fields.

use intake_map::jaro_winkler;
use intake_model::{CanonicalField, CanonicalRecord, TransformOptions, Vocabulary};

use crate::issue::Issue;

/// Minimum similarity for a "did you mean" suggestion.
const NEAREST_MIN_SIMILARITY: f64 = 0.8;

/// Report values the transformer could not match to a vocabulary term.
pub fn check(record: &CanonicalRecord, vocabularies: &TransformOptions) -> Vec<Issue> {
    let mut issues = Vec::new();
    for field in [
        CanonicalField::Status,
        CanonicalField::Priority,
        CanonicalField::Offer,
    ] {
        let Some(coded) = record.coded(field) else {
            continue;
        };
        if coded.recognized {
            continue;
        }
        let vocabulary = vocabularies.vocabulary(field);
        issues.push(Issue::UnknownValue {
            field,
            value: coded.value.clone(),
            nearest: vocabulary.and_then(|v| nearest_value(v, &coded.value)),
            allowed: vocabulary
                .map(|v| v.values().map(ToString::to_string).collect())
                .unwrap_or_default(),
        });
    }
    issues
}

/// Closest known value by Jaro-Winkler over values and synonyms.
pub fn nearest_value(vocabulary: &Vocabulary, raw: &str) -> Option<String> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let mut best: Option<(&str, f64)> = None;
    for term in &vocabulary.terms {
        let spellings = std::iter::once(&term.value).chain(&term.synonyms);
        for spelling in spellings {
            let score = jaro_winkler(&needle, &spelling.to_lowercase());
            if score >= NEAREST_MIN_SIMILARITY && best.is_none_or(|(_, s)| score > s) {
                best = Some((term.value.as_str(), score));
            }
        }
    }
    best.map(|(value, _)| value.to_string())
}
