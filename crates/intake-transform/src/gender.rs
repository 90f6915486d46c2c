//! Gender token mapping.

use std::collections::BTreeMap;

use intake_model::Gender;

/// Built-in tokens, lower-cased, without trailing dots.
const BUILTIN_TOKENS: &[(&str, Gender)] = &[
    ("m", Gender::Male),
    ("male", Gender::Male),
    ("man", Gender::Male),
    ("mann", Gender::Male),
    ("männlich", Gender::Male),
    ("maennlich", Gender::Male),
    ("herr", Gender::Male),
    ("hr", Gender::Male),
    ("w", Gender::Female),
    ("f", Gender::Female),
    ("female", Gender::Female),
    ("woman", Gender::Female),
    ("frau", Gender::Female),
    ("fr", Gender::Female),
    ("weiblich", Gender::Female),
    ("d", Gender::Diverse),
    ("x", Gender::Diverse),
    ("divers", Gender::Diverse),
    ("diverse", Gender::Diverse),
    ("inter", Gender::Diverse),
    ("non-binary", Gender::Diverse),
    ("nonbinary", Gender::Diverse),
    ("nichtbinär", Gender::Diverse),
];

/// Map a gender token to the closed enum.
///
/// Caller-supplied tokens are checked before the built-in table. Their keys
/// are compared in the same folded form as the input, so a template key
/// `"K.A."` matches a cell `"k.a"`.
pub fn parse_gender(value: &str, overrides: &BTreeMap<String, Gender>) -> Option<Gender> {
    let token = token_key(value);
    if token.is_empty() {
        return None;
    }
    if let Some(gender) = overrides
        .iter()
        .find(|(key, _)| token_key(key) == token)
        .map(|(_, gender)| *gender)
    {
        return Some(gender);
    }
    BUILTIN_TOKENS
        .iter()
        .find(|(known, _)| *known == token)
        .map(|(_, gender)| *gender)
}

/// Lower-cased, trimmed, without trailing dots.
fn token_key(value: &str) -> String {
    value.trim().trim_end_matches('.').trim().to_lowercase()
}
