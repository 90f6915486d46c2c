//! Import templates handed over by the template-storage collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::CanonicalField;
use crate::options::TransformOptions;

/// A stored mapping plus transform options for a recurring import.
///
/// `column_mappings` is keyed by header text; a `null` target marks a column
/// that must stay unmapped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportTemplate {
    pub name: String,
    pub column_mappings: BTreeMap<String, Option<CanonicalField>>,
    pub transform: TransformOptions,
}

impl ImportTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mapping(mut self, header: &str, field: Option<CanonicalField>) -> Self {
        self.column_mappings.insert(header.to_string(), field);
        self
    }

    /// Check that no field is targeted by two headers.
    pub fn validate(&self) -> Result<()> {
        let mut seen: BTreeMap<CanonicalField, &str> = BTreeMap::new();
        for (header, field) in &self.column_mappings {
            let Some(field) = field else {
                continue;
            };
            if let Some(first) = seen.insert(*field, header) {
                return Err(ModelError::DuplicateTemplateField {
                    field: field.key().to_string(),
                    first: first.to_string(),
                    second: header.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_rejected() {
        let template = ImportTemplate::new("weekly")
            .with_mapping("Name", Some(CanonicalField::LastName))
            .with_mapping("Nachname", Some(CanonicalField::LastName));
        let err = template.validate().unwrap_err();
        assert!(matches!(err, ModelError::DuplicateTemplateField { .. }));
    }

    #[test]
    fn test_ignored_columns_allowed() {
        let template = ImportTemplate::new("weekly")
            .with_mapping("Intern", None)
            .with_mapping("Bemerkung", None)
            .with_mapping("Vorname", Some(CanonicalField::FirstName));
        assert!(template.validate().is_ok());
    }

    #[test]
    fn test_template_from_json() {
        let json = r#"{
            "name": "crm export",
            "column_mappings": {"Kd-Nr": "external_id", "Intern": null},
            "transform": {"phone_format": "combined"}
        }"#;
        let template: ImportTemplate = serde_json::from_str(json).expect("parse template");
        assert_eq!(
            template.column_mappings.get("Kd-Nr"),
            Some(&Some(CanonicalField::ExternalId))
        );
        assert_eq!(template.column_mappings.get("Intern"), Some(&None));
    }
}
