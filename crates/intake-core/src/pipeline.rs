//! End-to-end import: map, transform, validate, deduplicate.

use std::ops::ControlFlow;

use intake_map::{
    ColumnMapper, ColumnOverrides, ConfidenceThresholds, MappingResult, normalize_header,
};
use intake_model::{CanonicalField, ImportTemplate, TransformOptions};
use intake_transform::RowTransformer;
use intake_validate::{BatchValidation, Progress, ValidationOptions, Validator};
use serde::Serialize;
use tracing::info;

use crate::dedupe::{DedupeOutcome, dedupe_import};
use crate::error::Result;

/// Output of [`ImportSession::execute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    /// Issues and row buckets over every transformed record.
    pub validation: BatchValidation,
    /// Transformed records split into first occurrences and duplicates.
    pub dedupe: DedupeOutcome,
}

impl ImportOutcome {
    /// True when no record has a validation error.
    pub fn is_valid(&self) -> bool {
        self.validation.stats.is_valid()
    }
}

/// One import: parsed headers and rows plus the options that drive each
/// stage.
///
/// Mapping is proposed first so a caller can review or adjust it; the
/// accepted mapping is then executed.
#[derive(Debug, Clone)]
pub struct ImportSession<'a> {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    mapper: ColumnMapper<'a>,
    overrides: ColumnOverrides,
    transform: TransformOptions,
    validation: ValidationOptions,
}

impl ImportSession<'static> {
    /// Session with the built-in aliases and default options.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::with_mapper(headers, rows, ColumnMapper::default())
    }
}

impl<'a> ImportSession<'a> {
    pub fn with_mapper(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        mapper: ColumnMapper<'a>,
    ) -> Self {
        Self {
            headers,
            rows,
            mapper,
            overrides: ColumnOverrides::default(),
            transform: TransformOptions::default(),
            validation: ValidationOptions::default(),
        }
    }

    /// Apply a stored template: its header mappings become overrides and
    /// its transform options replace the defaults.
    pub fn with_template(mut self, template: &ImportTemplate) -> Result<Self> {
        template.validate()?;
        self.overrides = ColumnOverrides::from_template(template, &self.headers);
        self.transform = template.transform.clone();
        info!(
            template = %template.name,
            overrides = self.overrides.len(),
            "applied import template"
        );
        Ok(self)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ColumnOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_transform_options(mut self, options: TransformOptions) -> Self {
        self.transform = options;
        self
    }

    #[must_use]
    pub fn with_validation_options(mut self, options: ValidationOptions) -> Self {
        self.validation = options;
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn transform_options(&self) -> &TransformOptions {
        &self.transform
    }

    /// Thresholds that sort proposed mappings into confidence levels.
    pub fn thresholds(&self) -> &ConfidenceThresholds {
        &self.mapper.config().thresholds
    }

    /// Headers after encoding repair, as shown to users.
    pub fn display_headers(&self) -> Vec<String> {
        self.headers
            .iter()
            .map(|header| normalize_header(header).display)
            .collect()
    }

    /// Infer a mapping for every canonical field from headers and the first
    /// rows.
    pub fn propose_mapping(&self) -> Result<MappingResult> {
        let sample_count = self.rows.len().min(self.mapper.config().sample_limit);
        let samples = &self.rows[..sample_count];
        let mapping = self.mapper.find_best_mappings_with_overrides(
            CanonicalField::all(),
            &self.headers,
            Some(samples),
            &self.overrides,
        )?;
        Ok(mapping)
    }

    /// Run transform, validation and deduplication with `mapping`.
    pub fn execute(&self, mapping: &MappingResult) -> ImportOutcome {
        self.execute_with_progress(mapping, |_| ControlFlow::Continue(()))
    }

    /// Like [`Self::execute`], reporting validation progress.
    ///
    /// A cancelled validation still deduplicates every transformed record.
    pub fn execute_with_progress<F>(&self, mapping: &MappingResult, progress: F) -> ImportOutcome
    where
        F: FnMut(Progress) -> ControlFlow<()>,
    {
        let headers = self.display_headers();
        let assignments = mapping.assignments();
        let records = RowTransformer::new(
            &headers,
            &assignments,
            &mapping.ignored_columns,
            &self.transform,
        )
        .transform_rows(&self.rows);

        let validation = Validator::new(self.validation.clone())
            .with_vocabularies(self.transform.clone())
            .validate_batch_with_progress(&records, progress);
        let dedupe = dedupe_import(records);

        info!(
            rows = self.rows.len(),
            unique = dedupe.deduped_rows.len(),
            duplicates = dedupe.duplicates.len(),
            errors = validation.stats.error_rows,
            "import executed"
        );
        ImportOutcome { validation, dedupe }
    }
}
