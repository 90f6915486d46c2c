//! String similarity measures used by the scorer.

use std::collections::BTreeSet;

use rapidfuzz::distance::{jaro, levenshtein as lev};

/// Longest common prefix credited by the Winkler adjustment.
const WINKLER_PREFIX_MAX: usize = 4;
/// Winkler prefix scaling factor.
const WINKLER_SCALE: f64 = 0.1;

/// Edit distance in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    lev::distance(a.chars(), b.chars())
}

/// `1 - distance / max_len`; two empty strings are identical.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Jaro-Winkler similarity with the prefix bonus applied unconditionally.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let base = jaro::similarity(a.chars(), b.chars());
    let prefix = a
        .chars()
        .zip(b.chars())
        .take(WINKLER_PREFIX_MAX)
        .take_while(|(x, y)| x == y)
        .count();
    (base + WINKLER_SCALE * prefix as f64 * (1.0 - base)).clamp(0.0, 1.0)
}

/// Best of Levenshtein and Jaro-Winkler similarity.
pub fn fuzzy_similarity(a: &str, b: &str) -> f64 {
    levenshtein_similarity(a, b).max(jaro_winkler(a, b))
}

/// Jaccard overlap of two token sets.
pub fn token_overlap<A, B>(a: &[A], b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let left: BTreeSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let right: BTreeSet<&str> = b.iter().map(AsRef::as_ref).collect();
    match (left.is_empty(), right.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let shared = left.intersection(&right).count();
            let union = left.union(&right).count();
            shared as f64 / union as f64
        }
    }
}
