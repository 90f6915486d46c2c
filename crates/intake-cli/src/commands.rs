use std::fs::{self, File};
use std::io::BufWriter;
use std::ops::ControlFlow;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use intake_cli::input::read_table;
use intake_cli::logging::redact_value;
use intake_core::ImportSession;
use intake_model::{CanonicalField, DateOrder, ImportTemplate, PhoneFormat};
use intake_validate::ValidationOptions;
use tracing::{debug, info, info_span, warn};

use crate::cli::{DateOrderArg, InputArgs, MapArgs, RunArgs};
use crate::summary::{apply_table_style, print_mapping};
use crate::types::RunResult;

pub fn run_fields() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Label", "Priority", "Expected content"]);
    apply_table_style(&mut table);
    for field in CanonicalField::all() {
        let content = field
            .expected_content()
            .map_or_else(|| "-".to_string(), |content| content.to_string());
        table.add_row(vec![
            field.key().to_string(),
            field.label().to_string(),
            field.priority().to_string(),
            content,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_map(args: &MapArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let mapping = session.propose_mapping().context("propose mapping")?;
    print_mapping(
        &session.display_headers(),
        &mapping,
        session.thresholds(),
        args.min_level.into(),
        args.show_unmapped,
    );
    Ok(())
}

pub fn run_import(args: &RunArgs) -> Result<RunResult> {
    let input = &args.input.input;
    let span = info_span!("run", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut session = load_session(&args.input)?;
    let mut transform = session.transform_options().clone();
    if let Some(order) = args.date_order {
        transform = transform.with_date_order(match order {
            DateOrderArg::DayFirst => DateOrder::DayFirst,
            DateOrderArg::MonthFirst => DateOrder::MonthFirst,
        });
    }
    if args.combined_phone {
        transform = transform.with_phone_format(PhoneFormat::Combined);
    }
    let mut validation = ValidationOptions::default();
    if let Some(date) = args.reference_date {
        validation = validation.with_today(date);
    }
    session = session
        .with_transform_options(transform)
        .with_validation_options(validation);

    let proposed = session.propose_mapping().context("propose mapping")?;
    let (mapping, dropped_suggestions) = if args.accept_suggestions {
        (proposed, 0)
    } else {
        let confirmed = proposed.confirmed_only();
        let dropped = proposed.mappings.len() - confirmed.mappings.len();
        if dropped > 0 {
            warn!(
                dropped,
                "mapping suggestions need confirmation and were not applied; \
                 rerun with --accept-suggestions or pin them in a template"
            );
        }
        (confirmed, dropped)
    };

    let bar = progress_bar(args.no_progress)?;
    let outcome = session.execute_with_progress(&mapping, |progress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.processed as u64);
        ControlFlow::Continue(())
    });
    bar.finish_and_clear();

    for duplicate in &outcome.dedupe.duplicates {
        debug!(
            row = duplicate.record.row_number,
            original_row = duplicate.original_row,
            basis = duplicate.key.basis.label(),
            key = redact_value(&duplicate.key.value),
            "duplicate"
        );
    }

    let result = RunResult {
        input: input.clone(),
        headers: session.display_headers(),
        mapping,
        outcome,
        dropped_suggestions,
        output: args.output.clone(),
    };
    if let Some(path) = &args.output {
        write_report(path, &result)?;
    }
    info!(
        rows = session.rows().len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}

fn load_session(args: &InputArgs) -> Result<ImportSession<'static>> {
    let table = read_table(&args.input, args.delimiter)?;
    let session = ImportSession::new(table.headers, table.rows);
    match &args.template {
        Some(path) => {
            let template = load_template(path)?;
            session
                .with_template(&template)
                .with_context(|| format!("apply template {}", path.display()))
        }
        None => Ok(session),
    }
}

fn load_template(path: &Path) -> Result<ImportTemplate> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read template {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse template {}", path.display()))
}

fn progress_bar(hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} rows")?
            .progress_chars("=> "),
    );
    bar.set_message("validating");
    Ok(bar)
}

fn write_report(path: &Path, result: &RunResult) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), result)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}
