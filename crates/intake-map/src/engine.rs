//! Mapping assigner: greedy one-to-one assignment of fields to columns.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use intake_model::CanonicalField;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aliases::{AliasTable, default_aliases};
use crate::detect::{DEFAULT_SAMPLE_LIMIT, suggest_fields};
use crate::error::{MappingError, Result};
use crate::overrides::ColumnOverrides;
use crate::score::{FieldScorer, ScoringWeights};
use crate::types::{ColumnCandidate, ContentSuggestion, FieldGuess};

/// Content-only suggestions kept per unmapped column.
const MAX_CONTENT_SUGGESTIONS: usize = 3;

/// Confidence level categories for mapping quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// At or above the suggestion floor; needs confirmation.
    Low,
    /// Reasonable match that should be reviewed.
    Medium,
    /// Accepted automatically.
    High,
}

impl ConfidenceLevel {
    /// Returns a human-readable description of the confidence level.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - accepted automatically",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs confirmation",
        }
    }
}

/// Thresholds separating confidence levels.
///
/// - Below `low`: not suggested at all
/// - `low` to `medium`: [`ConfidenceLevel::Low`]
/// - `medium` to `high`: [`ConfidenceLevel::Medium`]
/// - At or above `high`: [`ConfidenceLevel::High`], accepted without review
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    /// Automatic acceptance (default: 0.80).
    pub high: f64,
    /// Default: 0.60.
    pub medium: f64,
    /// Suggestion floor (default: 0.40).
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.80,
            medium: 0.60,
            low: 0.40,
        }
    }
}

impl ConfidenceThresholds {
    /// Fewer automatic acceptances, fewer weak suggestions.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            high: 0.90,
            medium: 0.75,
            low: 0.55,
        }
    }

    /// More suggestions for exploratory mapping.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            high: 0.70,
            medium: 0.50,
            low: 0.30,
        }
    }

    /// Returns `None` if the score is below the low threshold.
    #[must_use]
    pub fn categorize(&self, confidence: f64) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }
}

/// Mapper configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub thresholds: ConfidenceThresholds,
    pub weights: ScoringWeights,
    /// Sample values inspected per column.
    pub sample_limit: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            thresholds: ConfidenceThresholds::default(),
            weights: ScoringWeights::default(),
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

impl MapperConfig {
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit.max(1);
        self
    }
}

/// How a column's field was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStatus {
    /// Supplied by the caller.
    Override,
    /// At or above the automatic acceptance threshold.
    Auto,
    /// Between the suggestion floor and the acceptance threshold.
    NeedsConfirmation,
}

impl MappingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Auto => "auto",
            Self::NeedsConfirmation => "confirm",
        }
    }
}

/// A column with its chosen field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMapping {
    pub column: usize,
    /// Display form of the header.
    pub header: String,
    pub status: MappingStatus,
    pub guess: FieldGuess,
}

impl ColumnMapping {
    pub fn field(&self) -> CanonicalField {
        self.guess.field
    }

    pub fn confidence(&self) -> f64 {
        self.guess.confidence
    }
}

/// Result of a mapping run. Each field and each column appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MappingResult {
    /// Mapped columns in column order.
    pub mappings: Vec<ColumnMapping>,
    /// Columns explicitly ignored by an override.
    pub ignored_columns: Vec<usize>,
    /// Columns without an acceptable guess.
    pub unmapped_columns: Vec<usize>,
    /// Requested fields that were not assigned.
    pub unmapped_fields: Vec<CanonicalField>,
    /// Fields suggested by sample content alone, per unmapped column.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content_suggestions: BTreeMap<usize, Vec<ContentSuggestion>>,
}

impl MappingResult {
    pub fn field_for_column(&self, column: usize) -> Option<CanonicalField> {
        self.mappings
            .iter()
            .find(|m| m.column == column)
            .map(ColumnMapping::field)
    }

    pub fn column_for_field(&self, field: CanonicalField) -> Option<usize> {
        self.mappings
            .iter()
            .find(|m| m.field() == field)
            .map(|m| m.column)
    }

    /// Column index to field.
    pub fn assignments(&self) -> BTreeMap<usize, CanonicalField> {
        self.mappings.iter().map(|m| (m.column, m.field())).collect()
    }

    /// Mappings a human still has to confirm.
    pub fn needs_confirmation(&self) -> Vec<&ColumnMapping> {
        self.mappings
            .iter()
            .filter(|m| m.status == MappingStatus::NeedsConfirmation)
            .collect()
    }

    /// Copy without unconfirmed suggestions; their columns and fields
    /// become unmapped.
    #[must_use]
    pub fn confirmed_only(&self) -> Self {
        let mut result = self.clone();
        let (kept, dropped): (Vec<_>, Vec<_>) = result
            .mappings
            .into_iter()
            .partition(|m| m.status != MappingStatus::NeedsConfirmation);
        result.mappings = kept;
        let dropped_columns: BTreeSet<usize> = dropped.iter().map(|m| m.column).collect();
        for suggestion in result.content_suggestions.values_mut().flatten() {
            if suggestion
                .mapped_to
                .is_some_and(|column| dropped_columns.contains(&column))
            {
                suggestion.mapped_to = None;
            }
        }
        for mapping in dropped {
            if mapping.guess.signals.content > 0.0 {
                result
                    .content_suggestions
                    .entry(mapping.column)
                    .or_default()
                    .push(ContentSuggestion {
                        field: mapping.field(),
                        confidence: mapping.guess.signals.content,
                        mapped_to: None,
                    });
            }
            result.unmapped_columns.push(mapping.column);
            result.unmapped_fields.push(mapping.field());
        }
        result.unmapped_columns.sort_unstable();
        result
    }

    /// Number of mappings at each confidence level.
    #[must_use]
    pub fn count_by_level(
        &self,
        thresholds: &ConfidenceThresholds,
    ) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for mapping in &self.mappings {
            if let Some(level) = thresholds.categorize(mapping.confidence()) {
                *counts.entry(level).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Mappings at or above `min_level`.
    #[must_use]
    pub fn filter_by_level(
        &self,
        min_level: ConfidenceLevel,
        thresholds: &ConfidenceThresholds,
    ) -> Vec<&ColumnMapping> {
        self.mappings
            .iter()
            .filter(|m| {
                thresholds
                    .categorize(m.confidence())
                    .is_some_and(|level| level >= min_level)
            })
            .collect()
    }

    #[must_use]
    pub fn min_confidence(&self) -> Option<f64> {
        self.mappings
            .iter()
            .map(ColumnMapping::confidence)
            .min_by(f64::total_cmp)
    }

    #[must_use]
    pub fn max_confidence(&self) -> Option<f64> {
        self.mappings
            .iter()
            .map(ColumnMapping::confidence)
            .max_by(f64::total_cmp)
    }

    #[must_use]
    pub fn mean_confidence(&self) -> Option<f64> {
        if self.mappings.is_empty() {
            return None;
        }
        let sum: f64 = self.mappings.iter().map(ColumnMapping::confidence).sum();
        Some(sum / self.mappings.len() as f64)
    }

    /// Content-only suggestions for an unmapped column.
    pub fn suggestions_for(&self, column: usize) -> &[ContentSuggestion] {
        self.content_suggestions
            .get(&column)
            .map_or(&[], Vec::as_slice)
    }
}

/// Maps source columns onto canonical fields.
///
/// The mapper scores every (field, column) pair, sorts the guesses by
/// confidence and accepts them greedily while neither side is taken. The
/// result is deterministic but not globally optimal.
///
/// # Example
///
/// ```
/// use intake_map::{ColumnMapper, MapperConfig, default_aliases};
/// use intake_model::CanonicalField;
///
/// let mapper = ColumnMapper::new(default_aliases(), MapperConfig::default());
/// let headers = ["Vorname", "Nachname"];
/// let result = mapper.find_best_mappings(CanonicalField::all(), &headers, None);
/// assert_eq!(result.field_for_column(0), Some(CanonicalField::FirstName));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapper<'a> {
    aliases: &'a AliasTable,
    config: MapperConfig,
}

impl Default for ColumnMapper<'static> {
    fn default() -> Self {
        Self::new(default_aliases(), MapperConfig::default())
    }
}

impl<'a> ColumnMapper<'a> {
    pub fn new(aliases: &'a AliasTable, config: MapperConfig) -> Self {
        Self { aliases, config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    fn scorer(&self) -> FieldScorer<'a> {
        FieldScorer::new(self.aliases, self.config.weights)
    }

    /// Scores one field against every candidate header, best first.
    ///
    /// `sample_columns[i]` holds sample values for header `i`. With no
    /// headers a single zero-confidence guess is returned.
    pub fn guess_column<S: AsRef<str>>(
        &self,
        field: CanonicalField,
        headers: &[S],
        sample_columns: Option<&[Vec<String>]>,
    ) -> Vec<FieldGuess> {
        if headers.is_empty() {
            return vec![FieldGuess::no_candidates(field)];
        }
        let scorer = self.scorer();
        let mut guesses: Vec<FieldGuess> =
            ColumnCandidate::from_columns(headers, sample_columns, self.config.sample_limit)
                .iter()
                .map(|candidate| scorer.score(field, candidate))
                .collect();
        guesses.sort_by(compare_guesses);
        guesses
    }

    /// Best conflict-free mapping of `fields` onto `headers`.
    pub fn find_best_mappings<S: AsRef<str>>(
        &self,
        fields: &[CanonicalField],
        headers: &[S],
        sample_rows: Option<&[Vec<String>]>,
    ) -> MappingResult {
        let candidates = ColumnCandidate::from_rows(headers, sample_rows, self.config.sample_limit);
        self.assign(fields, &candidates, &BTreeMap::new())
    }

    /// Like [`Self::find_best_mappings`], with overrides taking precedence.
    ///
    /// Fails when an override names a missing column or two overrides target
    /// the same field.
    pub fn find_best_mappings_with_overrides<S: AsRef<str>>(
        &self,
        fields: &[CanonicalField],
        headers: &[S],
        sample_rows: Option<&[Vec<String>]>,
        overrides: &ColumnOverrides,
    ) -> Result<MappingResult> {
        let mut resolved: BTreeMap<usize, Option<CanonicalField>> = BTreeMap::new();
        let mut claimed: BTreeMap<CanonicalField, usize> = BTreeMap::new();
        for (column, target) in overrides.iter() {
            if column >= headers.len() {
                return Err(MappingError::ColumnOutOfRange {
                    column,
                    columns: headers.len(),
                });
            }
            if let Some(field) = target
                && let Some(first) = claimed.insert(field, column)
            {
                return Err(MappingError::FieldAlreadyAssigned {
                    field,
                    first,
                    second: column,
                });
            }
            resolved.insert(column, target);
        }
        let candidates = ColumnCandidate::from_rows(headers, sample_rows, self.config.sample_limit);
        Ok(self.assign(fields, &candidates, &resolved))
    }

    fn assign(
        &self,
        fields: &[CanonicalField],
        candidates: &[ColumnCandidate],
        overrides: &BTreeMap<usize, Option<CanonicalField>>,
    ) -> MappingResult {
        let thresholds = self.config.thresholds;
        let mut requested: Vec<CanonicalField> = Vec::with_capacity(fields.len());
        for field in fields {
            if !requested.contains(field) {
                requested.push(*field);
            }
        }

        let mut mappings = Vec::new();
        let mut ignored_columns = Vec::new();
        let mut taken_columns: BTreeSet<usize> = BTreeSet::new();
        let mut taken_fields: BTreeSet<CanonicalField> = BTreeSet::new();

        for (column, target) in overrides {
            taken_columns.insert(*column);
            let Some(candidate) = candidates.get(*column) else {
                continue;
            };
            match target {
                Some(field) => {
                    taken_fields.insert(*field);
                    mappings.push(ColumnMapping {
                        column: *column,
                        header: candidate.header.display.clone(),
                        status: MappingStatus::Override,
                        guess: FieldGuess {
                            field: *field,
                            column: Some(*column),
                            header: Some(candidate.header.display.clone()),
                            confidence: 1.0,
                            signals: Default::default(),
                            reasons: vec!["manual override".to_string()],
                        },
                    });
                }
                None => ignored_columns.push(*column),
            }
        }

        let scorer = self.scorer();
        let mut guesses: Vec<FieldGuess> = Vec::new();
        for candidate in candidates {
            if taken_columns.contains(&candidate.index) {
                continue;
            }
            for field in &requested {
                if taken_fields.contains(field) {
                    continue;
                }
                let guess = scorer.score(*field, candidate);
                if guess.confidence >= thresholds.low {
                    guesses.push(guess);
                }
            }
        }
        guesses.sort_by(compare_guesses);

        for i in 0..guesses.len() {
            let Some(column) = guesses[i].column else {
                continue;
            };
            let field = guesses[i].field;
            if taken_fields.contains(&field) || taken_columns.contains(&column) {
                continue;
            }
            let ties = tie_notes(&guesses, i, &taken_fields, &taken_columns);
            taken_fields.insert(field);
            taken_columns.insert(column);

            let mut guess = guesses[i].clone();
            guess.reasons.extend(ties);
            let status = if guess.confidence >= thresholds.high {
                MappingStatus::Auto
            } else {
                MappingStatus::NeedsConfirmation
            };
            debug!(
                column,
                field = %field,
                confidence = guess.confidence,
                status = status.label(),
                "column assigned"
            );
            mappings.push(ColumnMapping {
                column,
                header: guess.header.clone().unwrap_or_default(),
                status,
                guess,
            });
        }

        mappings.sort_by_key(|m| m.column);
        let unmapped_columns: Vec<usize> = candidates
            .iter()
            .map(|c| c.index)
            .filter(|index| !taken_columns.contains(index))
            .collect();
        let unmapped_fields: Vec<CanonicalField> = requested
            .iter()
            .copied()
            .filter(|field| !taken_fields.contains(field))
            .collect();

        let assigned: BTreeMap<CanonicalField, usize> =
            mappings.iter().map(|m| (m.field(), m.column)).collect();
        let mut content_suggestions = BTreeMap::new();
        for candidate in candidates
            .iter()
            .filter(|c| !taken_columns.contains(&c.index))
        {
            let suggestions: Vec<ContentSuggestion> = suggest_fields(&candidate.hints)
                .into_iter()
                .filter(|(field, _)| requested.contains(field))
                .take(MAX_CONTENT_SUGGESTIONS)
                .map(|(field, confidence)| ContentSuggestion {
                    field,
                    confidence,
                    mapped_to: assigned.get(&field).copied(),
                })
                .collect();
            if !suggestions.is_empty() {
                debug!(
                    column = candidate.index,
                    suggested = suggestions.len(),
                    "unmapped column has content suggestions"
                );
                content_suggestions.insert(candidate.index, suggestions);
            }
        }

        info!(
            columns = candidates.len(),
            mapped = mappings.len(),
            ignored = ignored_columns.len(),
            unmapped = unmapped_columns.len(),
            "mapping complete"
        );

        MappingResult {
            mappings,
            ignored_columns,
            unmapped_columns,
            unmapped_fields,
            content_suggestions,
        }
    }
}

/// Confidence descending, then exact alias hits, then field priority, then
/// column order.
///
/// Scores are clamped, so a saturated fuzzy/content guess can tie with an
/// exact alias hit; the alias hit wins.
fn compare_guesses(a: &FieldGuess, b: &FieldGuess) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then(b.signals.exact_alias.cmp(&a.signals.exact_alias))
        .then(a.field.priority().cmp(&b.field.priority()))
        .then(a.column.cmp(&b.column))
}

/// Reasons describing equally scored rivals that lost the tie-break.
fn tie_notes(
    guesses: &[FieldGuess],
    winner: usize,
    taken_fields: &BTreeSet<CanonicalField>,
    taken_columns: &BTreeSet<usize>,
) -> Vec<String> {
    let won = &guesses[winner];
    let mut notes = Vec::new();
    for rival in guesses[winner + 1..]
        .iter()
        .take_while(|g| g.confidence.total_cmp(&won.confidence) == Ordering::Equal)
    {
        let Some(column) = rival.column else {
            continue;
        };
        if taken_fields.contains(&rival.field) || taken_columns.contains(&column) {
            continue;
        }
        let by_alias = won.signals.exact_alias && !rival.signals.exact_alias;
        if rival.field == won.field {
            let rule = if by_alias { "exact alias" } else { "column order" };
            notes.push(format!("tie with column {} resolved by {rule}", column + 1));
        } else if Some(column) == won.column {
            let rule = if by_alias { "exact alias" } else { "field priority" };
            notes.push(format!("tie with field {} resolved by {rule}", rival.field));
        }
    }
    notes
}

/// [`ColumnMapper::guess_column`] with the built-in aliases and defaults.
pub fn guess_column<S: AsRef<str>>(
    field: CanonicalField,
    headers: &[S],
    sample_columns: Option<&[Vec<String>]>,
) -> Vec<FieldGuess> {
    ColumnMapper::default().guess_column(field, headers, sample_columns)
}

/// [`ColumnMapper::find_best_mappings`] with the built-in aliases and defaults.
pub fn find_best_mappings<S: AsRef<str>>(
    fields: &[CanonicalField],
    headers: &[S],
    sample_rows: Option<&[Vec<String>]>,
) -> MappingResult {
    ColumnMapper::default().find_best_mappings(fields, headers, sample_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn test_categorize() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.categorize(0.95), Some(ConfidenceLevel::High));
        assert_eq!(thresholds.categorize(0.80), Some(ConfidenceLevel::High));
        assert_eq!(thresholds.categorize(0.65), Some(ConfidenceLevel::Medium));
        assert_eq!(thresholds.categorize(0.40), Some(ConfidenceLevel::Low));
        assert_eq!(thresholds.categorize(0.39), None);
        assert!(ConfidenceThresholds::strict().low > thresholds.low);
        assert!(ConfidenceThresholds::relaxed().high < thresholds.high);
    }

    #[test]
    fn test_repaired_street_header_maps_to_address() {
        let headers = ["Stra\u{FFFD}e", "Vorname", "Nachname"];
        let data = rows(&[&["Hauptstra\u{FFFD}e 1", "Max", "Mustermann"]]);
        let result = find_best_mappings(CanonicalField::all(), &headers, Some(&data));
        let street = &result.mappings[0];
        assert_eq!(street.field(), CanonicalField::Address);
        assert!(street.confidence() >= 0.8);
        assert_eq!(street.status, MappingStatus::Auto);
        assert_eq!(street.header, "Straße");
        assert_eq!(result.field_for_column(1), Some(CanonicalField::FirstName));
        assert_eq!(result.field_for_column(2), Some(CanonicalField::LastName));
    }

    #[test]
    fn test_override_wins_and_is_not_rescored() {
        let headers = ["Vorname", "Nachname", "Intern"];
        let overrides = ColumnOverrides::new()
            .with_field(0, CanonicalField::LastName)
            .with_ignored(2);
        let result = ColumnMapper::default()
            .find_best_mappings_with_overrides(CanonicalField::all(), &headers, None, &overrides)
            .unwrap();
        let first = &result.mappings[0];
        assert_eq!(first.status, MappingStatus::Override);
        assert_eq!(first.field(), CanonicalField::LastName);
        assert_eq!(first.confidence(), 1.0);
        assert_ne!(result.field_for_column(1), Some(CanonicalField::LastName));
        assert_eq!(result.ignored_columns, vec![2]);
        assert!(!result.unmapped_columns.contains(&2));
    }

    #[test]
    fn test_conflicting_overrides_rejected() {
        let headers = ["A", "B"];
        let mapper = ColumnMapper::default();
        let out_of_range = ColumnOverrides::new().with_field(5, CanonicalField::Email);
        assert_eq!(
            mapper
                .find_best_mappings_with_overrides(CanonicalField::all(), &headers, None, &out_of_range)
                .unwrap_err(),
            MappingError::ColumnOutOfRange {
                column: 5,
                columns: 2
            }
        );
        let twice = ColumnOverrides::new()
            .with_field(0, CanonicalField::Email)
            .with_field(1, CanonicalField::Email);
        assert!(matches!(
            mapper.find_best_mappings_with_overrides(CanonicalField::all(), &headers, None, &twice),
            Err(MappingError::FieldAlreadyAssigned { first: 0, second: 1, .. })
        ));
    }

    #[test]
    fn test_tie_broken_by_column_order() {
        let headers = ["E-Mail", "E-Mail"];
        let result = find_best_mappings(&[CanonicalField::Email], &headers, None);
        assert_eq!(result.mappings.len(), 1);
        assert_eq!(result.mappings[0].column, 0);
        assert!(result.mappings[0].guess.explain().contains("tie with column 2"));
        assert_eq!(result.unmapped_columns, vec![1]);
    }

    #[test]
    fn test_tie_broken_by_field_priority() {
        let headers = ["xyz"];
        let data = rows(&[&["01.02.2020"], &["03.04.2021"]]);
        let fields = [CanonicalField::ExitDate, CanonicalField::EntryDate];
        let result = find_best_mappings(&fields, &headers, Some(&data));
        assert_eq!(result.field_for_column(0), Some(CanonicalField::EntryDate));
        assert_eq!(result.mappings[0].status, MappingStatus::NeedsConfirmation);
        assert!(
            result.mappings[0]
                .guess
                .explain()
                .contains("tie with field exit_date")
        );
        assert_eq!(result.unmapped_fields, vec![CanonicalField::ExitDate]);
    }

    #[test]
    fn test_unknown_headers_unmapped() {
        let headers = ["qqq", "qqqq"];
        let result = find_best_mappings(CanonicalField::all(), &headers, None);
        assert!(result.mappings.is_empty());
        assert_eq!(result.unmapped_columns, vec![0, 1]);
        assert_eq!(result.unmapped_fields.len(), CanonicalField::all().len());
        assert_eq!(result.mean_confidence(), None);
        assert!(result.content_suggestions.is_empty());
    }

    #[test]
    fn test_guess_column_sorted_and_empty() {
        let guesses = guess_column(CanonicalField::Email, &["Telefon", "E-Mail"], None);
        assert_eq!(guesses.len(), 2);
        assert_eq!(guesses[0].column, Some(1));
        assert!(guesses[0].confidence >= guesses[1].confidence);

        let empty: [&str; 0] = [];
        let guesses = guess_column(CanonicalField::Email, &empty, None);
        assert_eq!(guesses.len(), 1);
        assert_eq!(guesses[0].confidence, 0.0);
        assert!(!guesses[0].reasons.is_empty());
    }

    #[test]
    fn test_level_statistics() {
        let headers = ["Vorname", "Nachname", "xyz"];
        let data = rows(&[&["Max", "Mustermann", "max@example.org"]]);
        let result = find_best_mappings(CanonicalField::all(), &headers, Some(&data));
        let thresholds = ConfidenceThresholds::default();
        let counts = result.count_by_level(&thresholds);
        assert_eq!(counts.get(&ConfidenceLevel::High), Some(&2));
        assert_eq!(counts.get(&ConfidenceLevel::Medium), Some(&1));
        assert_eq!(counts.get(&ConfidenceLevel::Low), None);
        assert_eq!(result.filter_by_level(ConfidenceLevel::High, &thresholds).len(), 2);
        assert_eq!(result.filter_by_level(ConfidenceLevel::Low, &thresholds).len(), 3);
        assert_eq!(result.max_confidence(), Some(1.0));
        assert!((result.min_confidence().unwrap() - 0.6).abs() < 1e-9);
        assert_eq!(result.needs_confirmation().len(), 1);
    }

    #[test]
    fn test_unmapped_column_lists_content_suggestions() {
        let headers = ["E-Mail", "xyz"];
        let data = rows(&[
            &["a@example.org", "b@example.org"],
            &["c@example.org", "d@example.org"],
        ]);
        let result = find_best_mappings(CanonicalField::all(), &headers, Some(&data));
        assert_eq!(result.field_for_column(0), Some(CanonicalField::Email));
        assert_eq!(result.unmapped_columns, vec![1]);
        let suggestions = result.suggestions_for(1);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].field, CanonicalField::Email);
        assert_eq!(suggestions[0].mapped_to, Some(0));
        assert_eq!(
            suggestions[0].reason(),
            "content looks like email (100% of samples); already mapped to column 1"
        );
        assert!(result.suggestions_for(0).is_empty());
    }

    #[test]
    fn test_empty_header_with_email_samples() {
        let data = rows(&[&["a@example.org", "b@example.org"], &["c@example.org", ""]]);
        let result = find_best_mappings(CanonicalField::all(), &["E-Mail", ""], Some(&data));
        assert_eq!(result.unmapped_columns, vec![1]);
        let suggestions = result.suggestions_for(1);
        assert_eq!(suggestions[0].field, CanonicalField::Email);
        assert_eq!(suggestions[0].mapped_to, Some(0));

        let lone = rows(&[&["a@example.org"], &["c@example.org"]]);
        let result = find_best_mappings(CanonicalField::all(), &[""], Some(&lone));
        assert_eq!(result.field_for_column(0), Some(CanonicalField::Email));
        assert_eq!(result.mappings[0].status, MappingStatus::NeedsConfirmation);
        let confirmed = result.confirmed_only();
        assert_eq!(confirmed.unmapped_columns, vec![0]);
        let suggestions = confirmed.suggestions_for(0);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].field, CanonicalField::Email);
        assert_eq!(suggestions[0].mapped_to, None);
    }

    #[test]
    fn test_confirmed_only_drops_suggestions() {
        let headers = ["Vorname", "Nachname", "xyz"];
        let data = rows(&[&["Max", "Mustermann", "max@example.org"]]);
        let result = find_best_mappings(CanonicalField::all(), &headers, Some(&data));
        let confirmed = result.confirmed_only();
        assert_eq!(confirmed.mappings.len(), 2);
        assert_eq!(confirmed.unmapped_columns, vec![2]);
        assert!(confirmed.unmapped_fields.contains(&CanonicalField::Email));
        assert!(confirmed.needs_confirmation().is_empty());
        let suggestions = confirmed.suggestions_for(2);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].field, CanonicalField::Email);
        assert_eq!(suggestions[0].mapped_to, None);
        assert!(result.suggestions_for(2).is_empty());
    }
}
