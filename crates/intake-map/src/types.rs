//! Types shared by the scorer and the assigner.

use intake_model::CanonicalField;
use serde::Serialize;

use crate::detect::{ContentHint, detect_content};
use crate::normalize::{RawHeader, normalize_header};

/// A source column ready for scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCandidate {
    /// Zero-based position in the source.
    pub index: usize,
    pub header: RawHeader,
    /// Non-empty sample values, at most the configured limit.
    pub samples: Vec<String>,
    /// Content detected in `samples`.
    pub hints: Vec<ContentHint>,
}

impl ColumnCandidate {
    pub fn new<S: AsRef<str>>(index: usize, raw_header: &str, samples: &[S], limit: usize) -> Self {
        let samples: Vec<String> = samples
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .take(limit)
            .map(str::to_string)
            .collect();
        let hints = detect_content(&samples, limit);
        Self {
            index,
            header: normalize_header(raw_header),
            samples,
            hints,
        }
    }

    /// Candidates from headers and row-major sample data.
    ///
    /// Short rows are tolerated; missing cells count as empty.
    pub fn from_rows<S: AsRef<str>>(
        headers: &[S],
        rows: Option<&[Vec<String>]>,
        limit: usize,
    ) -> Vec<Self> {
        let rows = rows.unwrap_or(&[]);
        headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let column: Vec<&str> = rows
                    .iter()
                    .filter_map(|row| row.get(index).map(String::as_str))
                    .collect();
                Self::new(index, header.as_ref(), &column, limit)
            })
            .collect()
    }

    /// Candidates from headers and column-major sample data.
    pub fn from_columns<S: AsRef<str>>(
        headers: &[S],
        columns: Option<&[Vec<String>]>,
        limit: usize,
    ) -> Vec<Self> {
        let empty: Vec<String> = Vec::new();
        headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let samples = columns
                    .and_then(|columns| columns.get(index))
                    .unwrap_or(&empty);
                Self::new(index, header.as_ref(), samples, limit)
            })
            .collect()
    }

    pub fn hint_for(&self, content: intake_model::ContentType) -> Option<&ContentHint> {
        self.hints.iter().find(|hint| hint.content == content)
    }
}

/// Raw signal values measured for one (field, column) pair, before gating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Signals {
    pub exact_alias: bool,
    pub token_overlap: f64,
    pub fuzzy: f64,
    pub content: f64,
    pub position: bool,
}

/// Scored guess that a column holds a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGuess {
    pub field: CanonicalField,
    /// `None` only for the empty-candidate guess.
    pub column: Option<usize>,
    /// Display form of the column header.
    pub header: Option<String>,
    /// Clamped to `[0, 1]`.
    pub confidence: f64,
    pub signals: Signals,
    pub reasons: Vec<String>,
}

impl FieldGuess {
    /// The guess returned when there is nothing to score.
    pub fn no_candidates(field: CanonicalField) -> Self {
        Self {
            field,
            column: None,
            header: None,
            confidence: 0.0,
            signals: Signals::default(),
            reasons: vec!["no candidates".to_string()],
        }
    }

    /// Reasons joined into a single line.
    pub fn explain(&self) -> String {
        self.reasons.join("; ")
    }
}

/// Field an unmapped column's content points to, ignoring its header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContentSuggestion {
    pub field: CanonicalField,
    /// Share of samples matching the field's expected content.
    pub confidence: f64,
    /// Column the field is already assigned to, if any.
    pub mapped_to: Option<usize>,
}

impl ContentSuggestion {
    pub fn reason(&self) -> String {
        let content = format!(
            "content looks like {} ({:.0}% of samples)",
            self.field,
            self.confidence * 100.0
        );
        match self.mapped_to {
            Some(column) => format!("{content}; already mapped to column {}", column + 1),
            None => content,
        }
    }
}
