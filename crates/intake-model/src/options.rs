//! Per-field transform options supplied by a stored template.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::CanonicalField;
use crate::record::Gender;

/// Preferred reading of ambiguous numeric dates like `03/04/2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

/// How phone numbers are stored after decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneFormat {
    /// Keep country, area and subscriber parts separate.
    #[default]
    Split,
    /// Keep only the country code; area and subscriber are joined.
    Combined,
}

/// What to do when a row has neither a first nor a last name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNamePolicy {
    /// Assign a placeholder last name; the validator reports an error.
    #[default]
    Placeholder,
    /// Leave both names empty; the validator still reports an error.
    LeaveEmpty,
}

/// One known value of an enumerated field with its accepted spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyTerm {
    /// Submission value written to the record.
    pub value: String,
    /// Alternative spellings, matched case-insensitively.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl VocabularyTerm {
    pub fn new(value: &str, synonyms: &[&str]) -> Self {
        Self {
            value: value.to_string(),
            synonyms: synonyms.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Known values for an enumerated business field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub terms: Vec<VocabularyTerm>,
}

impl Vocabulary {
    pub fn new(terms: Vec<VocabularyTerm>) -> Self {
        Self { terms }
    }

    /// Submission values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.value.as_str())
    }

    /// Default case-status vocabulary.
    pub fn default_status() -> Self {
        Self::new(vec![
            VocabularyTerm::new("active", &["aktiv", "laufend", "offen", "open"]),
            VocabularyTerm::new("inactive", &["inaktiv", "ruhend", "passiv"]),
            VocabularyTerm::new("pending", &["wartend", "in pruefung", "in prüfung"]),
            VocabularyTerm::new(
                "completed",
                &["abgeschlossen", "beendet", "erledigt", "done"],
            ),
            VocabularyTerm::new("cancelled", &["abgebrochen", "storniert", "canceled"]),
        ])
    }

    /// Default priority vocabulary.
    pub fn default_priority() -> Self {
        Self::new(vec![
            VocabularyTerm::new("low", &["niedrig", "gering"]),
            VocabularyTerm::new("normal", &["mittel", "medium", "standard"]),
            VocabularyTerm::new("high", &["hoch"]),
            VocabularyTerm::new("urgent", &["dringend", "sehr hoch", "kritisch"]),
        ])
    }

    /// Default offer vocabulary.
    pub fn default_offer() -> Self {
        Self::new(vec![
            VocabularyTerm::new("counseling", &["beratung", "sozialberatung"]),
            VocabularyTerm::new("coaching", &["einzelcoaching"]),
            VocabularyTerm::new(
                "training",
                &["qualifizierung", "schulung", "weiterbildung"],
            ),
            VocabularyTerm::new("placement", &["vermittlung", "jobvermittlung"]),
            VocabularyTerm::new("language_course", &["sprachkurs", "deutschkurs"]),
        ])
    }
}

/// Transform options for one import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Reading of ambiguous day/month dates.
    pub date_order: DateOrder,
    /// Split or combined phone storage.
    pub phone_format: PhoneFormat,
    /// Country calling code assumed for numbers with a trunk `0` prefix.
    pub default_country_code: String,
    /// Extra gender tokens checked before the built-in table. Keys are
    /// matched case-insensitively, ignoring trailing dots.
    pub gender_tokens: BTreeMap<String, Gender>,
    pub status_values: Vocabulary,
    pub priority_values: Vocabulary,
    pub offer_values: Vocabulary,
    pub missing_name_policy: MissingNamePolicy,
    /// Last name assigned under [`MissingNamePolicy::Placeholder`].
    pub placeholder_name: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            date_order: DateOrder::default(),
            phone_format: PhoneFormat::default(),
            default_country_code: "49".to_string(),
            gender_tokens: BTreeMap::new(),
            status_values: Vocabulary::default_status(),
            priority_values: Vocabulary::default_priority(),
            offer_values: Vocabulary::default_offer(),
            missing_name_policy: MissingNamePolicy::default(),
            placeholder_name: "Unbekannt".to_string(),
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    #[must_use]
    pub fn with_phone_format(mut self, format: PhoneFormat) -> Self {
        self.phone_format = format;
        self
    }

    #[must_use]
    pub fn with_missing_name_policy(mut self, policy: MissingNamePolicy) -> Self {
        self.missing_name_policy = policy;
        self
    }

    #[must_use]
    pub fn with_gender_token(mut self, token: &str, gender: Gender) -> Self {
        self.gender_tokens
            .insert(token.trim().trim_end_matches('.').to_lowercase(), gender);
        self
    }

    /// Vocabulary for an enumerated field.
    pub fn vocabulary(&self, field: CanonicalField) -> Option<&Vocabulary> {
        match field {
            CanonicalField::Status => Some(&self.status_values),
            CanonicalField::Priority => Some(&self.priority_values),
            CanonicalField::Offer => Some(&self.offer_values),
            _ => None,
        }
    }
}
