//! Builds canonical records from source rows and a resolved mapping.

use std::collections::{BTreeMap, BTreeSet};

use intake_model::{CanonicalField, CanonicalRecord, MissingNamePolicy, TransformOptions};
use tracing::{debug, info};

use crate::datetime::parse_date;
use crate::gender::parse_gender;
use crate::phone::parse_phone;
use crate::vocabulary::normalize_coded;

/// Where a source column's values go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTarget {
    /// A canonical field slot.
    Field(CanonicalField),
    /// The record's extension map under this key.
    Extension(String),
    /// Dropped.
    Ignored,
}

/// Applies a column assignment and per-field normalization to rows.
#[derive(Debug, Clone)]
pub struct RowTransformer<'a> {
    options: &'a TransformOptions,
    targets: Vec<ColumnTarget>,
}

impl<'a> RowTransformer<'a> {
    /// Plan the transform for the given headers.
    ///
    /// Columns without an assignment that are not listed in `ignored` are
    /// carried as extensions keyed by their header.
    pub fn new<S: AsRef<str>>(
        headers: &[S],
        assignments: &BTreeMap<usize, CanonicalField>,
        ignored: &[usize],
        options: &'a TransformOptions,
    ) -> Self {
        let ignored: BTreeSet<usize> = ignored.iter().copied().collect();
        let mut used_keys = BTreeSet::new();
        let targets = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                if let Some(field) = assignments.get(&index) {
                    return ColumnTarget::Field(*field);
                }
                if ignored.contains(&index) {
                    return ColumnTarget::Ignored;
                }
                let mut key = extension_key(header.as_ref(), index);
                if !used_keys.insert(key.clone()) {
                    key = format!("{key} ({})", index + 1);
                    used_keys.insert(key.clone());
                }
                ColumnTarget::Extension(key)
            })
            .collect();
        Self { options, targets }
    }

    pub fn targets(&self) -> &[ColumnTarget] {
        &self.targets
    }

    pub fn options(&self) -> &TransformOptions {
        self.options
    }

    /// Transform one row. `row_number` is the 1-based source row.
    ///
    /// Missing trailing cells are treated as empty. Conversion failures
    /// never abort the row; the source text is kept in
    /// [`CanonicalRecord::unparsed`].
    pub fn transform_row<S: AsRef<str>>(&self, row_number: usize, values: &[S]) -> CanonicalRecord {
        let mut record = CanonicalRecord::new(row_number);
        for (target, value) in self.targets.iter().zip(values) {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match target {
                ColumnTarget::Field(field) => self.apply(&mut record, *field, value),
                ColumnTarget::Extension(key) => {
                    record.extensions.insert(key.clone(), value.to_string());
                }
                ColumnTarget::Ignored => {}
            }
        }
        self.apply_name_policy(&mut record);
        record
    }

    /// Transform all rows, skipping rows whose cells are all empty.
    ///
    /// Row numbers stay aligned with the source, so a skipped row leaves a
    /// gap rather than shifting later rows.
    pub fn transform_rows<S: AsRef<str>>(&self, rows: &[Vec<S>]) -> Vec<CanonicalRecord> {
        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for (index, row) in rows.iter().enumerate() {
            if row.iter().all(|cell| cell.as_ref().trim().is_empty()) {
                skipped += 1;
                debug!(row = index + 1, "skipping blank row");
                continue;
            }
            records.push(self.transform_row(index + 1, row));
        }
        let unparsed: usize = records.iter().map(|r| r.unparsed.len()).sum();
        let placeholders = records.iter().filter(|r| r.name_placeholder).count();
        info!(
            rows = rows.len(),
            records = records.len(),
            skipped,
            unparsed,
            placeholders,
            "transformed rows"
        );
        records
    }

    fn apply(&self, record: &mut CanonicalRecord, field: CanonicalField, value: &str) {
        if field.is_date() {
            match parse_date(value, self.options.date_order) {
                Some(date) => {
                    if let Some(slot) = record.date_slot_mut(field) {
                        *slot = Some(date);
                    }
                }
                None => mark_unparsed(record, field, value),
            }
            return;
        }

        if let Some(slot) = record.phone_slot_mut(field) {
            *slot = parse_phone(
                value,
                &self.options.default_country_code,
                self.options.phone_format,
            );
            return;
        }

        if field == CanonicalField::Gender {
            match parse_gender(value, &self.options.gender_tokens) {
                Some(gender) => record.gender = Some(gender),
                None => mark_unparsed(record, field, value),
            }
            return;
        }

        if let Some(vocabulary) = self.options.vocabulary(field) {
            let coded = normalize_coded(vocabulary, value);
            if let Some(slot) = record.coded_slot_mut(field) {
                *slot = coded;
            }
            return;
        }

        if let Some(slot) = record.text_slot_mut(field) {
            *slot = Some(clean_text(field, value));
        }
    }

    fn apply_name_policy(&self, record: &mut CanonicalRecord) {
        if record.first_name.is_some() || record.last_name.is_some() {
            return;
        }
        match self.options.missing_name_policy {
            MissingNamePolicy::Placeholder => {
                record.last_name = Some(format!(
                    "{}-{}",
                    self.options.placeholder_name, record.row_number
                ));
                record.name_placeholder = true;
                debug!(row = record.row_number, "assigned placeholder name");
            }
            MissingNamePolicy::LeaveEmpty => {
                debug!(row = record.row_number, "row has no name");
            }
        }
    }
}

/// Transform rows in one call.
pub fn transform_rows<H: AsRef<str>, S: AsRef<str>>(
    headers: &[H],
    rows: &[Vec<S>],
    assignments: &BTreeMap<usize, CanonicalField>,
    ignored: &[usize],
    options: &TransformOptions,
) -> Vec<CanonicalRecord> {
    RowTransformer::new(headers, assignments, ignored, options).transform_rows(rows)
}

fn mark_unparsed(record: &mut CanonicalRecord, field: CanonicalField, value: &str) {
    debug!(row = record.row_number, field = %field, "value could not be converted");
    record.unparsed.insert(field, value.to_string());
}

fn extension_key(header: &str, index: usize) -> String {
    let key = collapse_whitespace(header);
    if key.is_empty() {
        format!("column_{}", index + 1)
    } else {
        key
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_text(field: CanonicalField, value: &str) -> String {
    match field {
        CanonicalField::Email => value.to_lowercase(),
        CanonicalField::Iban | CanonicalField::NationalId => value
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect(),
        CanonicalField::PostalCode | CanonicalField::TaxId => {
            value.chars().filter(|c| !c.is_whitespace()).collect()
        }
        _ => collapse_whitespace(value),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use intake_model::{DateOrder, Gender};

    use super::*;

    fn assignments(fields: &[(usize, CanonicalField)]) -> BTreeMap<usize, CanonicalField> {
        fields.iter().copied().collect()
    }

    #[test]
    fn test_typed_fields_are_converted() {
        let options = TransformOptions::default();
        let headers = ["Vorname", "Geb.", "Tel", "Geschlecht", "Status", "E-Mail", "IBAN"];
        let plan = assignments(&[
            (0, CanonicalField::FirstName),
            (1, CanonicalField::BirthDate),
            (2, CanonicalField::Phone),
            (3, CanonicalField::Gender),
            (4, CanonicalField::Status),
            (5, CanonicalField::Email),
            (6, CanonicalField::Iban),
        ]);
        let transformer = RowTransformer::new(&headers, &plan, &[], &options);
        let record = transformer.transform_row(
            1,
            &[
                " Max ",
                "01.02.1980",
                "030 1234567",
                "m",
                "Aktiv",
                "Max@Example.ORG",
                "de89 3704 0044 0532 0130 00",
            ],
        );

        assert_eq!(record.first_name.as_deref(), Some("Max"));
        assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(1980, 2, 1));
        let phone = record.phone.as_ref().unwrap();
        assert_eq!(phone.area_code.as_deref(), Some("30"));
        assert_eq!(record.gender, Some(Gender::Male));
        assert_eq!(record.status.as_ref().unwrap().value, "active");
        assert_eq!(record.email.as_deref(), Some("max@example.org"));
        assert_eq!(record.iban.as_deref(), Some("DE89370400440532013000"));
        assert!(record.unparsed.is_empty());
        assert!(!record.name_placeholder);
    }

    #[test]
    fn test_failed_conversions_are_kept_as_unparsed() {
        let options = TransformOptions::default();
        let headers = ["Name", "Eintritt", "Geschlecht"];
        let plan = assignments(&[
            (0, CanonicalField::LastName),
            (1, CanonicalField::EntryDate),
            (2, CanonicalField::Gender),
        ]);
        let record = RowTransformer::new(&headers, &plan, &[], &options)
            .transform_row(4, &["Muster", "31.02.2024", "k.A."]);
        assert_eq!(record.entry_date, None);
        assert_eq!(record.gender, None);
        assert_eq!(
            record.unparsed.get(&CanonicalField::EntryDate).map(String::as_str),
            Some("31.02.2024")
        );
        assert_eq!(
            record.unparsed.get(&CanonicalField::Gender).map(String::as_str),
            Some("k.A.")
        );
    }

    #[test]
    fn test_unmapped_columns_become_extensions() {
        let options = TransformOptions::default();
        let headers = ["Nachname", "Lieblings  farbe", "", "Intern", "Lieblings farbe"];
        let plan = assignments(&[(0, CanonicalField::LastName)]);
        let transformer = RowTransformer::new(&headers, &plan, &[3], &options);
        assert_eq!(transformer.targets()[3], ColumnTarget::Ignored);

        let record = transformer.transform_row(1, &["Muster", "blau", "x", "geheim", "rot"]);
        let keys: Vec<&str> = record.extensions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Lieblings farbe", "Lieblings farbe (5)", "column_3"]);
        assert!(!record.extensions.values().any(|v| v == "geheim"));
    }

    #[test]
    fn test_missing_names_get_placeholder() {
        let options = TransformOptions::default();
        let headers = ["E-Mail"];
        let plan = assignments(&[(0, CanonicalField::Email)]);
        let record =
            RowTransformer::new(&headers, &plan, &[], &options).transform_row(7, &["a@b.de"]);
        assert!(record.name_placeholder);
        assert_eq!(record.last_name.as_deref(), Some("Unbekannt-7"));
        assert_eq!(record.first_name, None);

        let options =
            TransformOptions::default().with_missing_name_policy(MissingNamePolicy::LeaveEmpty);
        let record =
            RowTransformer::new(&headers, &plan, &[], &options).transform_row(7, &["a@b.de"]);
        assert!(!record.name_placeholder);
        assert_eq!(record.last_name, None);
    }

    #[test]
    fn test_blank_rows_are_skipped_and_numbers_stay_aligned() {
        let options = TransformOptions::default().with_date_order(DateOrder::MonthFirst);
        let headers = vec!["Vorname".to_string(), "Datum".to_string()];
        let plan = assignments(&[(0, CanonicalField::FirstName), (1, CanonicalField::EntryDate)]);
        let rows = vec![
            vec!["Anna".to_string(), "03/04/2024".to_string()],
            vec![" ".to_string(), String::new()],
            vec!["Ben".to_string()],
        ];
        let records = transform_rows(&headers, &rows, &plan, &[], &options);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row_number, 1);
        assert_eq!(records[0].entry_date, NaiveDate::from_ymd_opt(2024, 3, 4));
        assert_eq!(records[1].row_number, 3);
        assert_eq!(records[1].entry_date, None);
        assert!(records[1].unparsed.is_empty());
    }

    #[test]
    fn test_unknown_coded_values_are_kept() {
        let options = TransformOptions::default();
        let headers = ["Nachname", "Angebot"];
        let plan = assignments(&[(0, CanonicalField::LastName), (1, CanonicalField::Offer)]);
        let record = RowTransformer::new(&headers, &plan, &[], &options)
            .transform_row(1, &["Muster", "Bewerbungstraining"]);
        let offer = record.offer.unwrap();
        assert_eq!(offer.value, "Bewerbungstraining");
        assert!(!offer.recognized);
    }
}
