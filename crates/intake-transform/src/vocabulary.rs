//! Matching of enumerated business values against a vocabulary.

use intake_model::{CodedValue, Vocabulary};

/// Uppercase alphanumerics only, so "In Prüfung" and "in-prüfung" agree.
fn compact_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

fn resolve_strict<'a>(vocabulary: &'a Vocabulary, trimmed: &str) -> Option<&'a str> {
    let lower = trimmed.to_lowercase();
    vocabulary.terms.iter().find_map(|term| {
        let matches = term.value.to_lowercase() == lower
            || term.synonyms.iter().any(|s| s.to_lowercase() == lower);
        matches.then_some(term.value.as_str())
    })
}

fn resolve_lenient<'a>(vocabulary: &'a Vocabulary, trimmed: &str) -> Option<&'a str> {
    if let Some(value) = resolve_strict(vocabulary, trimmed) {
        return Some(value);
    }
    let input = compact_key(trimmed);
    if input.is_empty() {
        return None;
    }
    vocabulary.terms.iter().find_map(|term| {
        let matches = compact_key(&term.value) == input
            || term.synonyms.iter().any(|s| compact_key(s) == input);
        matches.then_some(term.value.as_str())
    })
}

/// Resolve a raw value to a known submission value.
pub fn resolve_value<'a>(vocabulary: &'a Vocabulary, raw: &str) -> Option<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    resolve_lenient(vocabulary, trimmed)
}

/// Normalize an enumerated value, keeping unknown values as free text.
pub fn normalize_coded(vocabulary: &Vocabulary, raw: &str) -> Option<CodedValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(match resolve_value(vocabulary, trimmed) {
        Some(value) => CodedValue::known(value),
        None => CodedValue::unknown(trimmed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_and_synonyms_match_case_insensitively() {
        let status = Vocabulary::default_status();
        assert_eq!(resolve_value(&status, "Active"), Some("active"));
        assert_eq!(resolve_value(&status, "AKTIV"), Some("active"));
        assert_eq!(resolve_value(&status, "Abgeschlossen"), Some("completed"));
    }

    #[test]
    fn test_compact_key_fallback() {
        let status = Vocabulary::default_status();
        assert_eq!(resolve_value(&status, "In-Prüfung"), Some("pending"));
        let offer = Vocabulary::default_offer();
        assert_eq!(resolve_value(&offer, "Language Course"), Some("language_course"));
    }

    #[test]
    fn test_unknown_values_are_preserved() {
        let priority = Vocabulary::default_priority();
        assert_eq!(
            normalize_coded(&priority, " Sofort "),
            Some(CodedValue::unknown("Sofort"))
        );
        assert_eq!(
            normalize_coded(&priority, "hoch"),
            Some(CodedValue::known("high"))
        );
        assert_eq!(normalize_coded(&priority, "  "), None);
        assert_eq!(resolve_value(&priority, "--"), None);
    }
}
