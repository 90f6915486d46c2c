//! Row transformation for tabular imports.
//!
//! Converts raw cell text into a [`CanonicalRecord`](intake_model::CanonicalRecord)
//! using a resolved column assignment and the import's
//! [`TransformOptions`](intake_model::TransformOptions).

pub mod datetime;
pub mod gender;
pub mod phone;
pub mod transformer;
pub mod vocabulary;

pub use datetime::{format_iso_date, parse_date, resolve_day_month};
pub use gender::parse_gender;
pub use phone::parse_phone;
pub use transformer::{ColumnTarget, RowTransformer, transform_rows};
pub use vocabulary::{normalize_coded, resolve_value};
