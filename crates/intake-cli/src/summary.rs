use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use intake_map::{
    ConfidenceLevel, ConfidenceThresholds, ContentSuggestion, MappingResult, MappingStatus,
};
use intake_validate::{Category, Severity, ValidationIssue};

use crate::types::RunResult;

pub fn print_mapping(
    headers: &[String],
    mapping: &MappingResult,
    thresholds: &ConfidenceThresholds,
    min_level: ConfidenceLevel,
    show_unmapped: bool,
) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Status"),
        header_cell("Reasons"),
    ]);
    apply_mapping_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);

    let mut mappings = mapping.filter_by_level(min_level, thresholds);
    mappings.sort_by_key(|m| m.column);
    let hidden = mapping.mappings.len() - mappings.len();
    for entry in mappings {
        table.add_row(vec![
            Cell::new(entry.column + 1),
            Cell::new(&entry.header),
            Cell::new(entry.field().key())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(percent(entry.confidence())),
            status_cell(entry.status),
            Cell::new(entry.guess.reasons.join("\n")),
        ]);
    }
    for &column in &mapping.ignored_columns {
        table.add_row(vec![
            Cell::new(column + 1),
            Cell::new(headers.get(column).map_or("", String::as_str)),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("ignored"),
            dim_cell("excluded by template"),
        ]);
    }
    println!("{table}");

    for line in confidence_lines(mapping, thresholds) {
        println!("{line}");
    }
    if hidden > 0 {
        println!("{hidden} mapping(s) below the requested level not shown.");
    }
    let confirm = mapping.needs_confirmation().len();
    if confirm > 0 {
        println!("{confirm} mapping(s) need confirmation.");
    }
    print_suggestions(headers, mapping);
    if show_unmapped {
        let columns: Vec<&str> = mapping
            .unmapped_columns
            .iter()
            .filter_map(|&column| headers.get(column).map(String::as_str))
            .collect();
        let fields: Vec<&str> = mapping.unmapped_fields.iter().map(|f| f.key()).collect();
        println!("Unmapped columns: {}", list_or_dash(&columns));
        println!("Unmapped fields: {}", list_or_dash(&fields));
    }
}

pub fn print_summary(result: &RunResult, max_issues: usize) {
    let outcome = &result.outcome;
    let stats = &outcome.validation.stats;
    println!("Input: {}", result.input.display());
    if let Some(path) = &result.output {
        println!("Report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Valid"),
        header_cell("Warnings"),
        header_cell("Errors"),
        header_cell("Unique"),
        header_cell("Duplicates"),
    ]);
    apply_table_style(&mut table);
    for index in 0..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(stats.total_rows).add_attribute(Attribute::Bold),
        count_cell(stats.valid_rows, Color::Green),
        count_cell(stats.warning_rows, Color::Yellow),
        count_cell(stats.error_rows, Color::Red),
        Cell::new(outcome.dedupe.deduped_rows.len()),
        count_cell(outcome.dedupe.duplicates.len(), Color::Yellow),
    ]);
    println!("{table}");

    if result.dropped_suggestions > 0 {
        println!(
            "{} suggested mapping(s) were not applied (use --accept-suggestions).",
            result.dropped_suggestions
        );
    }
    if outcome.validation.cancelled {
        println!("Validation was cancelled; counts cover processed rows only.");
    }
    print_suggestions(&result.headers, &result.mapping);
    print_category_table(&outcome.validation.issues);
    print_issue_table(&outcome.validation.issues, max_issues);
}

/// Mapping counts per confidence level, highest first, then the spread.
fn confidence_lines(mapping: &MappingResult, thresholds: &ConfidenceThresholds) -> Vec<String> {
    let mut lines: Vec<String> = mapping
        .count_by_level(thresholds)
        .iter()
        .rev()
        .map(|(level, count)| format!("{count} {}", level.description()))
        .collect();
    if let (Some(min), Some(mean), Some(max)) = (
        mapping.min_confidence(),
        mapping.mean_confidence(),
        mapping.max_confidence(),
    ) {
        lines.push(format!(
            "Confidence: min {}, mean {}, max {}",
            percent(min),
            percent(mean),
            percent(max)
        ));
    }
    lines
}

fn suggestion_lines(headers: &[String], mapping: &MappingResult) -> Vec<String> {
    mapping
        .unmapped_columns
        .iter()
        .filter_map(|&column| {
            let suggestions = mapping.suggestions_for(column);
            if suggestions.is_empty() {
                return None;
            }
            let reasons: Vec<String> = suggestions.iter().map(ContentSuggestion::reason).collect();
            let header = headers.get(column).map_or("", String::as_str);
            Some(format!(
                "  column {} '{header}': {}",
                column + 1,
                reasons.join("; ")
            ))
        })
        .collect()
}

fn print_suggestions(headers: &[String], mapping: &MappingResult) {
    let lines = suggestion_lines(headers, mapping);
    if lines.is_empty() {
        return;
    }
    println!("Unmapped columns with recognizable content:");
    for line in lines {
        println!("{line}");
    }
}

fn category_counts(issues: &[ValidationIssue]) -> Vec<(Category, usize)> {
    Category::all()
        .iter()
        .map(|&category| {
            let count = issues.iter().filter(|i| i.category == category).count();
            (category, count)
        })
        .collect()
}

fn print_category_table(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Checks"),
        header_cell("Issues"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (category, count) in category_counts(issues) {
        table.add_row(vec![
            Cell::new(category.label()),
            dim_cell(category.description()),
            count_cell(count, Color::Yellow),
        ]);
    }
    println!();
    println!("{table}");
}

fn print_issue_table(issues: &[ValidationIssue], max_issues: usize) {
    if issues.is_empty() || max_issues == 0 {
        return;
    }
    let ordered = ordered_issues(issues);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Severity"),
        header_cell("Field"),
        header_cell("Code"),
        header_cell("Message"),
        header_cell("Suggestion"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Center);
    for issue in ordered.iter().take(max_issues) {
        table.add_row(vec![
            Cell::new(issue.row),
            severity_cell(issue.severity),
            Cell::new(issue.field.map_or("-", |field| field.key())),
            Cell::new(&issue.code),
            Cell::new(&issue.message),
            issue
                .suggestion
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
    if ordered.len() > max_issues {
        println!("... {} more issue(s) not shown", ordered.len() - max_issues);
    }
}

/// Errors first, then by row and code.
fn ordered_issues(issues: &[ValidationIssue]) -> Vec<&ValidationIssue> {
    let mut ordered: Vec<&ValidationIssue> = issues.iter().collect();
    ordered.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then(a.row.cmp(&b.row))
            .then_with(|| a.code.cmp(&b.code))
    });
    ordered
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_mapping_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(3)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(180);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::UpperBoundary(Width::Fixed(26)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::DarkGrey),
    }
}

fn status_cell(status: MappingStatus) -> Cell {
    let cell = Cell::new(status.label());
    match status {
        MappingStatus::Override => cell.fg(Color::Cyan),
        MappingStatus::Auto => cell.fg(Color::Green),
        MappingStatus::NeedsConfirmation => cell.fg(Color::Yellow).add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

fn list_or_dash(items: &[&str]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
