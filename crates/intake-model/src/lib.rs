//! Canonical model for tabular imports.
//!
//! This crate defines the closed set of [`CanonicalField`]s, the
//! [`CanonicalRecord`] built per source row, and the option and template
//! types handed in by the template-storage collaborator.

pub mod error;
pub mod field;
pub mod options;
pub mod record;
pub mod template;

pub use error::{ModelError, Result};
pub use field::{CanonicalField, ContentType};
pub use options::{
    DateOrder, MissingNamePolicy, PhoneFormat, TransformOptions, Vocabulary, VocabularyTerm,
};
pub use record::{CanonicalRecord, CodedValue, Gender, PhoneNumber};
pub use template::ImportTemplate;
