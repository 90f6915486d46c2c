//! IBAN structure and ISO 7064 mod 97-10 checksum.

use std::sync::LazyLock;

use regex::Regex;

static IBAN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{2}[A-Z0-9]{11,30}$").expect("valid IBAN regex"));

/// True if the compact, upper-case IBAN has a valid shape and checksum.
pub fn is_valid_iban(iban: &str) -> bool {
    IBAN_SHAPE.is_match(iban) && mod97(iban) == Some(1)
}

/// Remainder of the rearranged IBAN modulo 97.
fn mod97(iban: &str) -> Option<u32> {
    let (head, tail) = iban.split_at(4);
    let mut remainder = 0u32;
    for ch in tail.chars().chain(head.chars()) {
        let value = ch.to_digit(36)?;
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }
    Some(remainder)
}
