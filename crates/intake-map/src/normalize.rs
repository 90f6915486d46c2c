//! Header repair, diacritic folding and tokenization.
//!
//! Headers from spreadsheet exports frequently arrive with encoding damage:
//! a German umlaut decoded twice ("Ã¤"), or lost altogether and replaced by
//! U+FFFD or `?`. Repairs run in a fixed order: double-encoding first, then
//! whole-word rules for known terms, then single-character heuristics.

use std::fmt;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Marker for a character lost in decoding.
const LOST: char = '\u{FFFD}';

/// UTF-8 byte pairs rendered as Windows-1252.
const DOUBLE_ENCODED: &[(&str, &str)] = &[
    ("Ã¤", "ä"),
    ("Ã¶", "ö"),
    ("Ã¼", "ü"),
    ("ÃŸ", "ß"),
    ("Ã„", "Ä"),
    ("Ã–", "Ö"),
    ("Ãœ", "Ü"),
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ã¡", "á"),
    ("Ã§", "ç"),
];

struct WordRule {
    broken: &'static str,
    fixed: &'static str,
    /// Only match when the rule covers the whole word.
    whole_word: bool,
}

const fn stem(broken: &'static str, fixed: &'static str) -> WordRule {
    WordRule {
        broken,
        fixed,
        whole_word: false,
    }
}

const fn word(broken: &'static str, fixed: &'static str) -> WordRule {
    WordRule {
        broken,
        fixed,
        whole_word: true,
    }
}

/// Known German terms with a lost character, lower-case.
const WORD_RULES: &[WordRule] = &[
    stem("stra\u{FFFD}e", "straße"),
    stem("ma\u{FFFD}nahme", "maßnahme"),
    stem("m\u{FFFD}nnlich", "männlich"),
    stem("pers\u{FFFD}nlich", "persönlich"),
    stem("t\u{FFFD}tigkeit", "tätigkeit"),
    stem("priorit\u{FFFD}t", "priorität"),
    stem("nationalit\u{FFFD}t", "nationalität"),
    stem("staatsangeh\u{FFFD}rigkeit", "staatsangehörigkeit"),
    stem("staatsb\u{FFFD}rgerschaft", "staatsbürgerschaft"),
    stem("gesch\u{FFFD}ft", "geschäft"),
    stem("f\u{FFFD}rderung", "förderung"),
    stem("k\u{FFFD}ndigung", "kündigung"),
    stem("erg\u{FFFD}nzung", "ergänzung"),
    stem("schl\u{FFFD}ssel", "schlüssel"),
    stem("b\u{FFFD}ro", "büro"),
    word("gr\u{FFFD}e", "größe"),
    word("f\u{FFFD}r", "für"),
];

/// Tokens ignored for overlap scoring.
const STOPWORDS: &[&str] = &[
    "der", "die", "das", "des", "dem", "den", "von", "vom", "zum", "zur", "und", "oder", "the",
    "of", "and", "or",
];

/// Which repair produced a substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairKind {
    /// UTF-8 read as Windows-1252.
    DoubleEncoding,
    /// A known word with a lost character.
    KnownWord,
    /// A lost character between two lower-case letters.
    LostSharpS,
    /// A lost character at a word edge.
    LostUmlaut,
    /// A lost character with no neighbouring letters.
    Dropped,
}

/// One substitution applied to a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repair {
    pub kind: RepairKind,
    pub from: String,
    pub to: String,
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A header with all derived forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawHeader {
    /// Input exactly as received.
    pub original: String,
    /// Input after encoding repairs.
    pub repaired: String,
    /// Repaired text with whitespace collapsed; diacritics preserved.
    pub display: String,
    /// Folded, lower-cased form with separators replaced by single spaces.
    pub normalized: String,
    /// `normalized` without spaces.
    pub compact: String,
    /// Normalized words minus stop-words.
    pub tokens: Vec<String>,
    /// Substitutions in the order they were applied.
    pub repairs: Vec<Repair>,
}

impl RawHeader {
    /// True when nothing usable is left after normalization.
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn was_repaired(&self) -> bool {
        !self.repairs.is_empty()
    }
}

/// Repairs and normalizes a raw header. Never fails; empty input yields
/// empty forms.
pub fn normalize_header(raw: &str) -> RawHeader {
    let mut repairs = Vec::new();
    let decoded = repair_double_encoding(raw, &mut repairs);
    let marked = mark_lost_characters(&decoded);
    let worded = apply_word_rules(&marked, &mut repairs);
    let repaired = apply_lost_char_heuristics(&worded, &mut repairs);
    let display = collapse_whitespace(&repaired);
    let normalized = fold_for_matching(&display);
    let compact = normalized.replace(' ', "");
    let tokens = tokenize(&normalized);
    RawHeader {
        original: raw.to_string(),
        repaired,
        display,
        normalized,
        compact,
        tokens,
        repairs,
    }
}

/// Matching form of arbitrary text, as used for header comparison.
pub fn normalize_text(raw: &str) -> String {
    normalize_header(raw).normalized
}

/// True when two headers share a normalized form.
pub fn headers_match(a: &str, b: &str) -> bool {
    normalize_text(a) == normalize_text(b)
}

fn repair_double_encoding(text: &str, repairs: &mut Vec<Repair>) -> String {
    if !text.contains('Ã') {
        return text.to_string();
    }
    let mut out = text.to_string();
    for (broken, fixed) in DOUBLE_ENCODED {
        if out.contains(broken) {
            out = out.replace(broken, fixed);
            repairs.push(Repair {
                kind: RepairKind::DoubleEncoding,
                from: (*broken).to_string(),
                to: (*fixed).to_string(),
            });
        }
    }
    out
}

/// Collapses each run of lost characters into a single [`LOST`] marker.
///
/// A run of `?` only counts when it sits between two letters; elsewhere it
/// is ordinary punctuation.
fn mark_lost_characters(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != LOST && c != '?' {
            out.push(c);
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && (chars[i] == LOST || chars[i] == '?') {
            i += 1;
        }
        let run = &chars[start..i];
        let has_lost = run.contains(&LOST);
        let between_letters = start > 0
            && chars[start - 1].is_alphabetic()
            && chars.get(i).is_some_and(|c| c.is_alphabetic());
        if has_lost || between_letters {
            out.push(LOST);
        } else {
            out.extend(run);
        }
    }
    out
}

fn apply_word_rules(text: &str, repairs: &mut Vec<Repair>) -> String {
    if !text.contains(LOST) {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    for rule in WORD_RULES {
        let pattern: Vec<char> = rule.broken.chars().collect();
        let mut start = 0;
        while let Some(pos) = find_pattern(&chars, &pattern, start) {
            let end = pos + pattern.len();
            if rule.whole_word && !is_word_bounded(&chars, pos, end) {
                start = pos + 1;
                continue;
            }
            let matched = &chars[pos..end];
            let replacement = match_case(matched, rule.fixed);
            repairs.push(Repair {
                kind: RepairKind::KnownWord,
                from: matched.iter().collect(),
                to: replacement.iter().collect(),
            });
            start = pos + replacement.len();
            chars.splice(pos..end, replacement);
        }
    }
    chars.into_iter().collect()
}

fn find_pattern(chars: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if pattern.is_empty() || chars.len() < pattern.len() {
        return None;
    }
    (from..=chars.len() - pattern.len()).find(|&i| {
        chars[i..i + pattern.len()]
            .iter()
            .zip(pattern)
            .all(|(c, p)| c == p || c.to_ascii_lowercase() == *p)
    })
}

fn is_word_bounded(chars: &[char], start: usize, end: usize) -> bool {
    let before = start == 0 || !chars[start - 1].is_alphabetic();
    let after = chars.get(end).is_none_or(|c| !c.is_alphabetic());
    before && after
}

/// Carries the casing of `matched` over to `fixed`.
fn match_case(matched: &[char], fixed: &str) -> Vec<char> {
    let letters: Vec<&char> = matched.iter().filter(|c| c.is_alphabetic()).collect();
    let all_upper = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
    if all_upper {
        return fixed.to_uppercase().chars().collect();
    }
    let mut out: Vec<char> = fixed.chars().collect();
    if matched.first().is_some_and(|c| c.is_uppercase())
        && let Some(first) = out.first().copied()
    {
        let upper: Vec<char> = first.to_uppercase().collect();
        out.splice(0..1, upper);
    }
    out
}

fn apply_lost_char_heuristics(text: &str, repairs: &mut Vec<Repair>) -> String {
    if !text.contains(LOST) {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c != LOST {
            out.push(c);
            continue;
        }
        let prev = i.checked_sub(1).map(|p| chars[p]).filter(|c| c.is_alphabetic());
        let next = chars.get(i + 1).copied().filter(|c| c.is_alphabetic());
        let (kind, replacement) = match (prev, next) {
            (Some(p), Some(n)) if p.is_lowercase() && n.is_lowercase() => {
                (RepairKind::LostSharpS, "ß")
            }
            (None, None) => (RepairKind::Dropped, ""),
            (p, n) => {
                let upper = n.is_some_and(char::is_uppercase)
                    || (p.is_none() && n.is_some())
                    || (p.is_some_and(char::is_uppercase) && n.is_none());
                (RepairKind::LostUmlaut, if upper { "Ä" } else { "ä" })
            }
        };
        out.push_str(replacement);
        repairs.push(Repair {
            kind,
            from: LOST.to_string(),
            to: replacement.to_string(),
        });
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Inserts a space at each lower-to-upper case boundary ("firstName").
fn split_camel_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev_lower = false;
    for c in text.chars() {
        if prev_lower && c.is_uppercase() {
            out.push(' ');
        }
        prev_lower = c.is_lowercase();
        out.push(c);
    }
    out
}

fn fold_for_matching(display: &str) -> String {
    let composed: String = split_camel_case(display).nfc().collect();
    let mut folded = String::with_capacity(composed.len());
    for c in composed.to_lowercase().chars() {
        match c {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'ß' => folded.push_str("ss"),
            _ => folded.push(c),
        }
    }
    let stripped: String = folded
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    collapse_whitespace(&stripped)
}

fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .split(' ')
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}
