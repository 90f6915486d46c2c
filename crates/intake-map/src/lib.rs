//! Column-mapping inference for tabular imports.
//!
//! Given raw, possibly mis-encoded headers and a few sample rows, this crate
//! infers which [`CanonicalField`](intake_model::CanonicalField) each column
//! holds. Every guess carries a confidence in `[0, 1]` and the reasons that
//! produced it.
//!
//! Data flow: [`normalize_header`] → [`FieldScorer`] (using the
//! [`AliasTable`], the fuzzy matcher and [`detect_content`]) →
//! [`ColumnMapper`] → [`MappingResult`].

pub mod aliases;
pub mod detect;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod normalize;
pub mod overrides;
pub mod score;
pub mod types;

pub use aliases::{AliasCollision, AliasForm, AliasKey, AliasTable, default_aliases};
pub use detect::{
    ContentHint, DEFAULT_SAMPLE_LIMIT, REPORT_THRESHOLD, classify_value, detect_content,
    suggest_fields,
};
pub use engine::{
    ColumnMapper, ColumnMapping, ConfidenceLevel, ConfidenceThresholds, MapperConfig,
    MappingResult, MappingStatus, find_best_mappings, guess_column,
};
pub use error::{MappingError, Result};
pub use fuzzy::{fuzzy_similarity, jaro_winkler, levenshtein, levenshtein_similarity, token_overlap};
pub use normalize::{RawHeader, Repair, RepairKind, headers_match, normalize_header, normalize_text};
pub use overrides::ColumnOverrides;
pub use score::{FUZZY_GATE, FieldScorer, ScoringWeights, TOKEN_OVERLAP_GATE};
pub use types::{ColumnCandidate, ContentSuggestion, FieldGuess, Signals};
