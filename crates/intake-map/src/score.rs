//! Field scoring: combines alias, token, fuzzy, content and position
//! signals into one confidence with a reason trail.
//!
//! Each signal is gated independently so that a weak, noisy signal adds
//! nothing rather than diluting a strong one.

use intake_model::CanonicalField;
use serde::{Deserialize, Serialize};

use crate::aliases::AliasTable;
use crate::fuzzy::{fuzzy_similarity, token_overlap};
use crate::types::{ColumnCandidate, FieldGuess, Signals};

/// Token overlap must exceed this to count.
pub const TOKEN_OVERLAP_GATE: f64 = 0.3;
/// Fuzzy similarity must reach this to count.
pub const FUZZY_GATE: f64 = 0.6;

/// Weight of each signal in the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub exact: f64,
    pub token: f64,
    pub fuzzy: f64,
    pub content: f64,
    pub position: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact: 1.0,
            token: 0.7,
            fuzzy: 0.4,
            content: 0.6,
            position: 0.2,
        }
    }
}

/// Scores (field, column) pairs against a shared alias table.
#[derive(Debug, Clone, Copy)]
pub struct FieldScorer<'a> {
    aliases: &'a AliasTable,
    weights: ScoringWeights,
}

impl<'a> FieldScorer<'a> {
    pub fn new(aliases: &'a AliasTable, weights: ScoringWeights) -> Self {
        Self { aliases, weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one column for one field.
    pub fn score(&self, field: CanonicalField, candidate: &ColumnCandidate) -> FieldGuess {
        let header = &candidate.header;
        let mut signals = Signals::default();
        let mut reasons = Vec::new();
        let mut total = 0.0;

        if !header.is_empty() {
            if let Some((hit, key)) =
                self.aliases
                    .lookup(&header.original, &header.normalized, &header.compact)
                && hit == field
            {
                signals.exact_alias = true;
                total += self.weights.exact;
                reasons.push(format!(
                    "header \"{}\" is a known alias ({} form)",
                    header.display,
                    key.label()
                ));
            }

            let (overlap, overlap_alias) = self.best_token_overlap(field, candidate);
            signals.token_overlap = overlap;
            if overlap > TOKEN_OVERLAP_GATE {
                total += self.weights.token * overlap;
                reasons.push(format!(
                    "token overlap {} with alias \"{}\"",
                    percent(overlap),
                    overlap_alias.unwrap_or_default()
                ));
            }

            let (similarity, similar_alias) = self.best_fuzzy(field, candidate);
            signals.fuzzy = similarity;
            if similarity >= FUZZY_GATE {
                total += self.weights.fuzzy * similarity;
                reasons.push(format!(
                    "fuzzy similarity {} to alias \"{}\"",
                    percent(similarity),
                    similar_alias.unwrap_or_default()
                ));
            }
        }

        if let Some(expected) = field.expected_content()
            && let Some(hint) = candidate.hint_for(expected)
        {
            signals.content = hint.confidence;
            total += self.weights.content * hint.confidence;
            reasons.push(format!(
                "{} of {} samples look like {}",
                hint.matches, hint.samples, expected
            ));
        }

        if let Some(window) = field.expected_position()
            && window.contains(&candidate.index)
        {
            signals.position = true;
            total += self.weights.position;
            reasons.push(format!(
                "column {} is a typical position for {}",
                candidate.index + 1,
                field
            ));
        }

        if reasons.is_empty() {
            reasons.push("no matching signal".to_string());
        } else if header.was_repaired() {
            let repairs: Vec<String> = header.repairs.iter().map(ToString::to_string).collect();
            reasons.push(format!("header repaired ({})", repairs.join(", ")));
        }

        FieldGuess {
            field,
            column: Some(candidate.index),
            header: Some(header.display.clone()),
            confidence: f64::clamp(total, 0.0, 1.0),
            signals,
            reasons,
        }
    }

    fn best_token_overlap(
        &self,
        field: CanonicalField,
        candidate: &ColumnCandidate,
    ) -> (f64, Option<&'a str>) {
        if candidate.header.tokens.is_empty() {
            return (0.0, None);
        }
        let mut best = (0.0, None);
        for form in self.aliases.forms(field) {
            if form.tokens.is_empty() {
                continue;
            }
            let overlap = token_overlap(&candidate.header.tokens, &form.tokens);
            if overlap > best.0 {
                best = (overlap, Some(form.raw.as_str()));
            }
        }
        best
    }

    fn best_fuzzy(
        &self,
        field: CanonicalField,
        candidate: &ColumnCandidate,
    ) -> (f64, Option<&'a str>) {
        let mut best = (0.0, None);
        for form in self.aliases.forms(field) {
            let similarity = fuzzy_similarity(&candidate.header.normalized, &form.normalized)
                .max(fuzzy_similarity(&candidate.header.compact, &form.compact));
            if similarity > best.0 {
                best = (similarity, Some(form.raw.as_str()));
            }
        }
        best
    }
}

fn percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}
