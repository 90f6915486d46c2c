//! Identity keys and duplicate grouping within one import batch.

use std::collections::BTreeMap;
use std::fmt;

use intake_map::normalize_text;
use intake_model::{CanonicalField, CanonicalRecord};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Fields hashed when neither an external id nor a name is available.
///
/// Kept sorted by key so the hash input is stable.
const CONTENT_FIELDS: &[CanonicalField] = &[
    CanonicalField::Address,
    CanonicalField::City,
    CanonicalField::Email,
    CanonicalField::HouseNumber,
    CanonicalField::Iban,
    CanonicalField::Mobile,
    CanonicalField::NationalId,
    CanonicalField::Phone,
    CanonicalField::PostalCode,
    CanonicalField::TaxId,
];

/// Which fields a key was derived from, most trustworthy first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyBasis {
    ExternalId,
    NameBirthDate,
    ContentHash,
    /// Nothing to key on; the key is unique to the row.
    Unkeyed,
}

impl KeyBasis {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExternalId => "external id",
            Self::NameBirthDate => "name + birth date",
            Self::ContentHash => "content hash",
            Self::Unkeyed => "unkeyed",
        }
    }
}

/// Deterministic identity of a record within a batch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DedupeKey {
    pub basis: KeyBasis,
    pub value: String,
}

impl DedupeKey {
    /// Derive the key from the most trustworthy available fields.
    pub fn for_record(record: &CanonicalRecord) -> Self {
        if let Some(id) = record.external_id.as_deref().map(str::trim)
            && !id.is_empty()
        {
            return Self {
                basis: KeyBasis::ExternalId,
                value: id.to_uppercase(),
            };
        }

        if !record.name_placeholder
            && (record.first_name.is_some() || record.last_name.is_some())
        {
            let first = fold_name(record.first_name.as_deref());
            let last = fold_name(record.last_name.as_deref());
            let birth = record
                .text(CanonicalField::BirthDate)
                .unwrap_or_default();
            return Self {
                basis: KeyBasis::NameBirthDate,
                value: format!("{first}|{last}|{birth}"),
            };
        }

        match content_hash(record) {
            Some(hash) => Self {
                basis: KeyBasis::ContentHash,
                value: hash,
            },
            None => Self {
                basis: KeyBasis::Unkeyed,
                value: format!("row:{}", record.row_number),
            },
        }
    }
}

impl fmt::Display for DedupeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn fold_name(name: Option<&str>) -> String {
    name.map(|n| normalize_text(n).replace(' ', ""))
        .unwrap_or_default()
}

/// SHA-256 over `key=value` lines, first 16 bytes as hex.
fn content_hash(record: &CanonicalRecord) -> Option<String> {
    let lines: Vec<String> = CONTENT_FIELDS
        .iter()
        .filter_map(|field| {
            let value = record.text(*field)?;
            let value = value.trim().to_lowercase();
            (!value.is_empty()).then(|| format!("{}={value}", field.key()))
        })
        .collect();
    if lines.is_empty() {
        return None;
    }
    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    let digest = hasher.finalize();
    Some(hex::encode(&digest[..16]))
}

/// A later row sharing a key with an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub record: CanonicalRecord,
    pub key: DedupeKey,
    /// 1-based source row of the first occurrence.
    pub original_row: usize,
}

/// Records split into first occurrences and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupeOutcome {
    /// First occurrence of every key, in source order.
    pub deduped_rows: Vec<CanonicalRecord>,
    /// Later occurrences, in source order.
    pub duplicates: Vec<DuplicateRecord>,
}

impl DedupeOutcome {
    /// Duplicates grouped by the row they repeat.
    pub fn by_original(&self) -> BTreeMap<usize, Vec<&DuplicateRecord>> {
        let mut groups: BTreeMap<usize, Vec<&DuplicateRecord>> = BTreeMap::new();
        for duplicate in &self.duplicates {
            groups.entry(duplicate.original_row).or_default().push(duplicate);
        }
        groups
    }
}

/// Group records by [`DedupeKey`]; the first occurrence wins.
///
/// Records are processed in the order given, which must be source order.
/// Duplicates are reported, never dropped.
pub fn dedupe_import(records: impl IntoIterator<Item = CanonicalRecord>) -> DedupeOutcome {
    let mut seen: BTreeMap<DedupeKey, usize> = BTreeMap::new();
    let mut outcome = DedupeOutcome::default();
    for record in records {
        let key = DedupeKey::for_record(&record);
        if let Some(original_row) = seen.get(&key).copied() {
            debug!(
                row = record.row_number,
                original_row,
                basis = key.basis.label(),
                "duplicate row"
            );
            outcome.duplicates.push(DuplicateRecord {
                record,
                key,
                original_row,
            });
        } else {
            seen.insert(key, record.row_number);
            outcome.deduped_rows.push(record);
        }
    }
    info!(
        unique = outcome.deduped_rows.len(),
        duplicates = outcome.duplicates.len(),
        "deduplicated batch"
    );
    outcome
}
