//! Caller-supplied column overrides.

use std::collections::BTreeMap;

use intake_model::{CanonicalField, ImportTemplate};
use tracing::warn;

use crate::normalize::headers_match;

/// Column decisions made by a human or a stored template.
///
/// An entry of `None` marks the column as ignored. Overridden columns and
/// fields are excluded from scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOverrides {
    entries: BTreeMap<usize, Option<CanonicalField>>,
}

impl ColumnOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field(mut self, column: usize, field: CanonicalField) -> Self {
        self.entries.insert(column, Some(field));
        self
    }

    #[must_use]
    pub fn with_ignored(mut self, column: usize) -> Self {
        self.entries.insert(column, None);
        self
    }

    /// Resolves a template's header-keyed mappings against the actual headers.
    ///
    /// When several source columns match the same template header, only the
    /// first one receives the field.
    pub fn from_template<S: AsRef<str>>(template: &ImportTemplate, headers: &[S]) -> Self {
        let mut overrides = Self::new();
        let mut used: BTreeMap<CanonicalField, usize> = BTreeMap::new();
        for (index, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            let Some((_, target)) = template
                .column_mappings
                .iter()
                .find(|(key, _)| headers_match(key, header))
            else {
                continue;
            };
            match target {
                Some(field) => {
                    if let Some(first) = used.get(field) {
                        warn!(
                            field = %field,
                            first = *first,
                            column = index,
                            "template field already matched an earlier column"
                        );
                        continue;
                    }
                    used.insert(*field, index);
                    overrides.entries.insert(index, Some(*field));
                }
                None => {
                    overrides.entries.insert(index, None);
                }
            }
        }
        overrides
    }

    pub fn get(&self, column: usize) -> Option<Option<CanonicalField>> {
        self.entries.get(&column).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<CanonicalField>)> + '_ {
        self.entries.iter().map(|(column, field)| (*column, *field))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
