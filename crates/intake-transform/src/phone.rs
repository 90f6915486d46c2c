//! Phone number decomposition.
//!
//! A number is split into country code, area code and subscriber when it
//! carries a recognizable prefix: `+CC`, `00CC`, or a national trunk `0`
//! (which implies the default country). Anything else is passed through
//! unchanged.

use intake_model::{PhoneFormat, PhoneNumber};

/// Country calling codes recognized after `+` or `00`, longest match wins.
const COUNTRY_CODES: &[&str] = &[
    "1", "7", "20", "27", "30", "31", "32", "33", "34", "36", "39", "40", "41", "43", "44", "45",
    "46", "47", "48", "49", "51", "52", "53", "54", "55", "56", "57", "58", "60", "61", "62",
    "63", "64", "65", "66", "81", "82", "84", "86", "90", "91", "92", "93", "94", "95", "98",
    "212", "213", "216", "218", "220", "221", "233", "234", "251", "252", "254", "255", "256",
    "350", "351", "352", "353", "354", "355", "356", "357", "358", "359", "370", "371", "372",
    "373", "374", "375", "376", "377", "378", "380", "381", "382", "383", "385", "386", "387",
    "389", "420", "421", "423", "961", "962", "963", "964", "965", "966", "967", "970", "971",
    "972", "973", "974", "975", "976", "977", "992", "993", "994", "995", "996", "998",
];

/// German mobile network prefixes (without trunk `0`).
const MOBILE_PREFIXES: &[&str] = &["15", "16", "17"];

const MIN_DIGITS: usize = 6;
const MAX_DIGITS: usize = 15;

/// Parse a phone value. `None` only for empty input.
pub fn parse_phone(value: &str, default_country: &str, format: PhoneFormat) -> Option<PhoneNumber> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let phone = decompose(trimmed, default_country)
        .map(|phone| match format {
            PhoneFormat::Split => phone,
            PhoneFormat::Combined => combine(phone),
        })
        .unwrap_or_else(|| PhoneNumber::passthrough(trimmed));
    Some(phone)
}

fn decompose(raw: &str, default_country: &str) -> Option<PhoneNumber> {
    if !raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '(' | ')' | '/' | '-' | '.'))
    {
        return None;
    }
    let digit_count = raw.chars().filter(char::is_ascii_digit).count();
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digit_count) {
        return None;
    }

    // "+49 (0)30 ..." carries a redundant trunk prefix.
    let cleaned = raw.replace("(0)", " ");
    let mut groups: Vec<String> = cleaned
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .map(ToString::to_string)
        .collect();
    if groups.is_empty() {
        return None;
    }

    let country_code = if cleaned.starts_with('+') {
        take_country_code(&mut groups)?
    } else if groups[0].starts_with("00") {
        groups[0].replace_range(..2, "");
        take_country_code(&mut groups)?
    } else if groups[0].starts_with('0') {
        groups[0].replace_range(..1, "");
        default_country.to_string()
    } else {
        return None;
    };
    groups.retain(|g| !g.is_empty());

    let (area_code, subscriber) = match groups.as_slice() {
        [] => return None,
        [only] => split_mobile_prefix(only, &country_code),
        [area, rest @ ..] => (Some(area.clone()), rest.concat()),
    };
    if subscriber.is_empty() {
        return None;
    }

    Some(PhoneNumber {
        raw: raw.to_string(),
        country_code: Some(country_code),
        area_code,
        subscriber,
    })
}

fn take_country_code(groups: &mut [String]) -> Option<String> {
    let first = groups.first_mut()?;
    let code = COUNTRY_CODES
        .iter()
        .filter(|code| first.starts_with(**code))
        .max_by_key(|code| code.len())?;
    first.replace_range(..code.len(), "");
    Some((*code).to_string())
}

fn split_mobile_prefix(digits: &str, country_code: &str) -> (Option<String>, String) {
    if country_code == "49"
        && digits.len() > 3
        && MOBILE_PREFIXES.iter().any(|p| digits.starts_with(p))
    {
        let (area, subscriber) = digits.split_at(3);
        return (Some(area.to_string()), subscriber.to_string());
    }
    (None, digits.to_string())
}

fn combine(phone: PhoneNumber) -> PhoneNumber {
    let subscriber = match &phone.area_code {
        Some(area) => format!("{area}{}", phone.subscriber),
        None => phone.subscriber.clone(),
    };
    PhoneNumber {
        area_code: None,
        subscriber,
        ..phone
    }
}
