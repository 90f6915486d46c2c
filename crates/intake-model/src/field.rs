//! The closed set of canonical fields every import maps onto.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of content a column's sample values can exhibit.
///
/// The content detector classifies samples into these families; each
/// canonical field declares the family it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Date,
    Email,
    Phone,
    PostalCode,
    IdNumber,
    Iban,
    PersonName,
    Address,
    Gender,
}

impl ContentType {
    /// All content types in detection order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Date,
            Self::Email,
            Self::Phone,
            Self::PostalCode,
            Self::IdNumber,
            Self::Iban,
            Self::PersonName,
            Self::Address,
            Self::Gender,
        ]
    }

    /// Stable key used in reasons and serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::PostalCode => "postal_code",
            Self::IdNumber => "id_number",
            Self::Iban => "iban",
            Self::PersonName => "person_name",
            Self::Address => "address",
            Self::Gender => "gender",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ContentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|ty| ty.key() == needle)
            .ok_or_else(|| ModelError::UnknownContentType(s.to_string()))
    }
}

/// A canonical domain attribute.
///
/// Declaration order is significant: it is the order used when alias
/// collisions are resolved and when fields are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    ExternalId,
    Salutation,
    AcademicTitle,
    FirstName,
    LastName,
    BirthName,
    BirthDate,
    BirthPlace,
    Gender,
    Nationality,
    Email,
    Phone,
    Mobile,
    Fax,
    Address,
    HouseNumber,
    PostalCode,
    City,
    Country,
    NationalId,
    TaxId,
    Iban,
    Company,
    JobTitle,
    EntryDate,
    ExitDate,
    FollowUpDate,
    Status,
    Priority,
    Offer,
    Notes,
}

impl CanonicalField {
    /// All canonical fields in declaration order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::ExternalId,
            Self::Salutation,
            Self::AcademicTitle,
            Self::FirstName,
            Self::LastName,
            Self::BirthName,
            Self::BirthDate,
            Self::BirthPlace,
            Self::Gender,
            Self::Nationality,
            Self::Email,
            Self::Phone,
            Self::Mobile,
            Self::Fax,
            Self::Address,
            Self::HouseNumber,
            Self::PostalCode,
            Self::City,
            Self::Country,
            Self::NationalId,
            Self::TaxId,
            Self::Iban,
            Self::Company,
            Self::JobTitle,
            Self::EntryDate,
            Self::ExitDate,
            Self::FollowUpDate,
            Self::Status,
            Self::Priority,
            Self::Offer,
            Self::Notes,
        ]
    }

    /// Stable snake_case key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ExternalId => "external_id",
            Self::Salutation => "salutation",
            Self::AcademicTitle => "academic_title",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::BirthName => "birth_name",
            Self::BirthDate => "birth_date",
            Self::BirthPlace => "birth_place",
            Self::Gender => "gender",
            Self::Nationality => "nationality",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Mobile => "mobile",
            Self::Fax => "fax",
            Self::Address => "address",
            Self::HouseNumber => "house_number",
            Self::PostalCode => "postal_code",
            Self::City => "city",
            Self::Country => "country",
            Self::NationalId => "national_id",
            Self::TaxId => "tax_id",
            Self::Iban => "iban",
            Self::Company => "company",
            Self::JobTitle => "job_title",
            Self::EntryDate => "entry_date",
            Self::ExitDate => "exit_date",
            Self::FollowUpDate => "follow_up_date",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Offer => "offer",
            Self::Notes => "notes",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExternalId => "External ID",
            Self::Salutation => "Salutation",
            Self::AcademicTitle => "Academic title",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::BirthName => "Birth name",
            Self::BirthDate => "Birth date",
            Self::BirthPlace => "Birth place",
            Self::Gender => "Gender",
            Self::Nationality => "Nationality",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Mobile => "Mobile",
            Self::Fax => "Fax",
            Self::Address => "Street address",
            Self::HouseNumber => "House number",
            Self::PostalCode => "Postal code",
            Self::City => "City",
            Self::Country => "Country",
            Self::NationalId => "Social insurance number",
            Self::TaxId => "Tax ID",
            Self::Iban => "IBAN",
            Self::Company => "Company",
            Self::JobTitle => "Job title",
            Self::EntryDate => "Entry date",
            Self::ExitDate => "Exit date",
            Self::FollowUpDate => "Follow-up date",
            Self::Status => "Status",
            Self::Priority => "Priority",
            Self::Offer => "Offer",
            Self::Notes => "Notes",
        }
    }

    /// Tie-break priority; lower ranks first.
    ///
    /// Identity fields come first so that they win ties in the assigner.
    pub fn priority(&self) -> u8 {
        match self {
            Self::ExternalId => 0,
            Self::LastName => 1,
            Self::FirstName => 2,
            Self::BirthDate => 3,
            Self::Email => 4,
            Self::NationalId => 5,
            Self::TaxId => 6,
            Self::Address => 10,
            Self::HouseNumber => 11,
            Self::PostalCode => 12,
            Self::City => 13,
            Self::Phone => 14,
            Self::Mobile => 15,
            Self::Gender => 16,
            Self::EntryDate => 20,
            Self::ExitDate => 21,
            Self::Status => 22,
            Self::Priority => 23,
            Self::Offer => 24,
            Self::FollowUpDate => 25,
            Self::Salutation => 30,
            Self::AcademicTitle => 31,
            Self::BirthName => 32,
            Self::BirthPlace => 33,
            Self::Nationality => 34,
            Self::Country => 35,
            Self::Fax => 36,
            Self::Iban => 37,
            Self::Company => 38,
            Self::JobTitle => 39,
            Self::Notes => 50,
        }
    }

    /// True for fields that contribute to record identity.
    pub fn is_identity(&self) -> bool {
        self.priority() < 10
    }

    /// The content family the field's values are expected to show.
    pub fn expected_content(&self) -> Option<ContentType> {
        match self {
            Self::BirthDate | Self::EntryDate | Self::ExitDate | Self::FollowUpDate => {
                Some(ContentType::Date)
            }
            Self::Email => Some(ContentType::Email),
            Self::Phone | Self::Mobile | Self::Fax => Some(ContentType::Phone),
            Self::PostalCode => Some(ContentType::PostalCode),
            Self::NationalId | Self::TaxId => Some(ContentType::IdNumber),
            Self::Iban => Some(ContentType::Iban),
            Self::FirstName | Self::LastName | Self::BirthName => Some(ContentType::PersonName),
            Self::Address => Some(ContentType::Address),
            Self::Gender => Some(ContentType::Gender),
            _ => None,
        }
    }

    /// Column positions where the field typically appears in exports.
    pub fn expected_position(&self) -> Option<RangeInclusive<usize>> {
        match self {
            Self::ExternalId => Some(0..=2),
            Self::Salutation => Some(0..=3),
            Self::AcademicTitle => Some(0..=4),
            Self::FirstName | Self::LastName => Some(0..=4),
            Self::Gender => Some(1..=8),
            Self::BirthDate => Some(2..=8),
            Self::Address => Some(3..=10),
            Self::HouseNumber => Some(4..=11),
            Self::PostalCode => Some(4..=12),
            Self::City => Some(5..=13),
            _ => None,
        }
    }

    /// True for date-valued fields.
    pub fn is_date(&self) -> bool {
        self.expected_content() == Some(ContentType::Date)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|field| field.key() == needle)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}
