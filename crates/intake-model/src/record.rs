//! Canonical record produced by the row transformer.
//!
//! A record is a fixed struct with one typed slot per canonical field plus an
//! explicit extension map for source columns outside the closed field set.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::field::CanonicalField;

/// Closed three-value gender enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Diverse,
}

impl Gender {
    /// Short code used in exports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "m",
            Self::Female => "f",
            Self::Diverse => "d",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A phone number, decomposed when a recognizable prefix was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    /// Value as it appeared in the source, trimmed.
    pub raw: String,
    /// Country calling code without `+` (e.g. "49").
    pub country_code: Option<String>,
    /// Area or network code without trunk prefix (e.g. "30", "170").
    pub area_code: Option<String>,
    /// Remaining digits.
    pub subscriber: String,
}

impl PhoneNumber {
    /// A number that could not be decomposed; stored as entered.
    pub fn passthrough(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            subscriber: raw.clone(),
            raw,
            country_code: None,
            area_code: None,
        }
    }

    /// True if a country code was recognized.
    pub fn is_decomposed(&self) -> bool {
        self.country_code.is_some()
    }

    /// Count of digits in the number as entered.
    pub fn digit_count(&self) -> usize {
        self.raw.chars().filter(char::is_ascii_digit).count()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.country_code, &self.area_code) {
            (Some(cc), Some(area)) => write!(f, "+{cc} {area} {}", self.subscriber),
            (Some(cc), None) => write!(f, "+{cc} {}", self.subscriber),
            _ => f.write_str(&self.raw),
        }
    }
}

/// Value of an enumerated business field.
///
/// Unknown values are kept as free text with `recognized == false` so they
/// are never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedValue {
    pub value: String,
    pub recognized: bool,
}

impl CodedValue {
    pub fn known(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            recognized: true,
        }
    }

    pub fn unknown(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            recognized: false,
        }
    }
}

/// A canonical record built from one source row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// 1-based index of the source row.
    pub row_number: usize,

    pub external_id: Option<String>,
    pub salutation: Option<String>,
    pub academic_title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub gender: Option<Gender>,
    pub nationality: Option<String>,
    pub email: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub mobile: Option<PhoneNumber>,
    pub fax: Option<PhoneNumber>,
    pub address: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub national_id: Option<String>,
    pub tax_id: Option<String>,
    pub iban: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: Option<CodedValue>,
    pub priority: Option<CodedValue>,
    pub offer: Option<CodedValue>,
    pub notes: Option<String>,

    /// Set when both names were missing and a placeholder was assigned.
    pub name_placeholder: bool,
    /// Source text of mapped values that failed conversion.
    pub unparsed: BTreeMap<CanonicalField, String>,
    /// Unmapped source columns, keyed by header.
    pub extensions: BTreeMap<String, String>,
}

impl CanonicalRecord {
    /// Create an empty record for a 1-based source row.
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            ..Self::default()
        }
    }

    /// Slot of a plain text field, `None` for typed fields.
    pub fn text_slot(&self, field: CanonicalField) -> Option<&Option<String>> {
        use CanonicalField as F;
        let slot = match field {
            F::ExternalId => &self.external_id,
            F::Salutation => &self.salutation,
            F::AcademicTitle => &self.academic_title,
            F::FirstName => &self.first_name,
            F::LastName => &self.last_name,
            F::BirthName => &self.birth_name,
            F::BirthPlace => &self.birth_place,
            F::Nationality => &self.nationality,
            F::Email => &self.email,
            F::Address => &self.address,
            F::HouseNumber => &self.house_number,
            F::PostalCode => &self.postal_code,
            F::City => &self.city,
            F::Country => &self.country,
            F::NationalId => &self.national_id,
            F::TaxId => &self.tax_id,
            F::Iban => &self.iban,
            F::Company => &self.company,
            F::JobTitle => &self.job_title,
            F::Notes => &self.notes,
            _ => return None,
        };
        Some(slot)
    }

    /// Mutable slot for a plain text field, `None` for typed fields.
    pub fn text_slot_mut(&mut self, field: CanonicalField) -> Option<&mut Option<String>> {
        use CanonicalField as F;
        let slot = match field {
            F::ExternalId => &mut self.external_id,
            F::Salutation => &mut self.salutation,
            F::AcademicTitle => &mut self.academic_title,
            F::FirstName => &mut self.first_name,
            F::LastName => &mut self.last_name,
            F::BirthName => &mut self.birth_name,
            F::BirthPlace => &mut self.birth_place,
            F::Nationality => &mut self.nationality,
            F::Email => &mut self.email,
            F::Address => &mut self.address,
            F::HouseNumber => &mut self.house_number,
            F::PostalCode => &mut self.postal_code,
            F::City => &mut self.city,
            F::Country => &mut self.country,
            F::NationalId => &mut self.national_id,
            F::TaxId => &mut self.tax_id,
            F::Iban => &mut self.iban,
            F::Company => &mut self.company,
            F::JobTitle => &mut self.job_title,
            F::Notes => &mut self.notes,
            _ => return None,
        };
        Some(slot)
    }

    /// Mutable slot for a date field.
    pub fn date_slot_mut(&mut self, field: CanonicalField) -> Option<&mut Option<NaiveDate>> {
        match field {
            CanonicalField::BirthDate => Some(&mut self.birth_date),
            CanonicalField::EntryDate => Some(&mut self.entry_date),
            CanonicalField::ExitDate => Some(&mut self.exit_date),
            CanonicalField::FollowUpDate => Some(&mut self.follow_up_date),
            _ => None,
        }
    }

    /// Mutable slot for a phone field.
    pub fn phone_slot_mut(&mut self, field: CanonicalField) -> Option<&mut Option<PhoneNumber>> {
        match field {
            CanonicalField::Phone => Some(&mut self.phone),
            CanonicalField::Mobile => Some(&mut self.mobile),
            CanonicalField::Fax => Some(&mut self.fax),
            _ => None,
        }
    }

    /// Mutable slot for an enumerated business field.
    pub fn coded_slot_mut(&mut self, field: CanonicalField) -> Option<&mut Option<CodedValue>> {
        match field {
            CanonicalField::Status => Some(&mut self.status),
            CanonicalField::Priority => Some(&mut self.priority),
            CanonicalField::Offer => Some(&mut self.offer),
            _ => None,
        }
    }

    /// Date value of a date field.
    pub fn date(&self, field: CanonicalField) -> Option<NaiveDate> {
        match field {
            CanonicalField::BirthDate => self.birth_date,
            CanonicalField::EntryDate => self.entry_date,
            CanonicalField::ExitDate => self.exit_date,
            CanonicalField::FollowUpDate => self.follow_up_date,
            _ => None,
        }
    }

    /// Phone value of a phone field.
    pub fn phone(&self, field: CanonicalField) -> Option<&PhoneNumber> {
        match field {
            CanonicalField::Phone => self.phone.as_ref(),
            CanonicalField::Mobile => self.mobile.as_ref(),
            CanonicalField::Fax => self.fax.as_ref(),
            _ => None,
        }
    }

    /// Coded value of an enumerated field.
    pub fn coded(&self, field: CanonicalField) -> Option<&CodedValue> {
        match field {
            CanonicalField::Status => self.status.as_ref(),
            CanonicalField::Priority => self.priority.as_ref(),
            CanonicalField::Offer => self.offer.as_ref(),
            _ => None,
        }
    }

    /// Textual rendering of any field, `None` when unset.
    ///
    /// Dates render as ISO 8601, phones through their `Display`.
    pub fn text(&self, field: CanonicalField) -> Option<String> {
        use CanonicalField as F;
        match field {
            F::BirthDate | F::EntryDate | F::ExitDate | F::FollowUpDate => self
                .date(field)
                .map(|d| d.format("%Y-%m-%d").to_string()),
            F::Phone | F::Mobile | F::Fax => self.phone(field).map(ToString::to_string),
            F::Status | F::Priority | F::Offer => self.coded(field).map(|c| c.value.clone()),
            F::Gender => self.gender.map(|g| g.code().to_string()),
            _ => self.text_slot(field).and_then(Clone::clone),
        }
    }

    /// True if no canonical field carries a value.
    pub fn is_blank(&self) -> bool {
        CanonicalField::all().iter().all(|f| self.text(*f).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_renders_typed_fields() {
        let mut record = CanonicalRecord::new(3);
        record.birth_date = NaiveDate::from_ymd_opt(1990, 5, 17);
        record.gender = Some(Gender::Female);
        record.status = Some(CodedValue::unknown("Warteliste"));
        *record.text_slot_mut(CanonicalField::City).unwrap() = Some("Berlin".to_string());

        assert_eq!(
            record.text(CanonicalField::BirthDate).as_deref(),
            Some("1990-05-17")
        );
        assert_eq!(record.text(CanonicalField::Gender).as_deref(), Some("f"));
        assert_eq!(
            record.text(CanonicalField::Status).as_deref(),
            Some("Warteliste")
        );
        assert_eq!(record.text(CanonicalField::City).as_deref(), Some("Berlin"));
        assert_eq!(record.text(CanonicalField::Email), None);
        assert!(!record.is_blank());
    }

    #[test]
    fn test_every_field_has_exactly_one_slot_kind() {
        let mut record = CanonicalRecord::new(1);
        for field in CanonicalField::all() {
            let kinds = [
                record.text_slot_mut(*field).is_some(),
                record.date_slot_mut(*field).is_some(),
                record.phone_slot_mut(*field).is_some(),
                record.coded_slot_mut(*field).is_some(),
                *field == CanonicalField::Gender,
            ];
            assert_eq!(kinds.iter().filter(|k| **k).count(), 1, "{field}");
        }
    }

    #[test]
    fn test_phone_display() {
        let phone = PhoneNumber {
            raw: "030 1234567".to_string(),
            country_code: Some("49".to_string()),
            area_code: Some("30".to_string()),
            subscriber: "1234567".to_string(),
        };
        assert_eq!(phone.to_string(), "+49 30 1234567");
        assert_eq!(PhoneNumber::passthrough("12345").to_string(), "12345");
    }

    #[test]
    fn test_record_serializes() {
        let mut record = CanonicalRecord::new(1);
        record.first_name = Some("Max".to_string());
        record
            .extensions
            .insert("Lieblingsfarbe".to_string(), "blau".to_string());
        let json = serde_json::to_string(&record).expect("serialize record");
        let round: CanonicalRecord = serde_json::from_str(&json).expect("deserialize record");
        assert_eq!(round, record);
    }
}
