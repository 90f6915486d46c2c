//! Deduplication and the end-to-end import pipeline.
//!
//! [`ImportSession`] ties the stages together: mapping inference from
//! `intake-map`, row transformation from `intake-transform`, batch
//! validation from `intake-validate`, and the [`dedupe_import`] pass in this
//! crate.

pub mod dedupe;
pub mod error;
pub mod pipeline;

pub use dedupe::{DedupeKey, DedupeOutcome, DuplicateRecord, KeyBasis, dedupe_import};
pub use error::{CoreError, Result};
pub use pipeline::{ImportOutcome, ImportSession};
