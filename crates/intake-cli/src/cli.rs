//! CLI argument definitions for `intake`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use intake_map::ConfidenceLevel;
use intake_validate::Severity;

#[derive(Parser)]
#[command(
    name = "intake",
    version,
    about = "Map, clean, validate and deduplicate tabular contact imports",
    long_about = "Infer which canonical field each column of a CSV export holds,\n\
                  then transform, validate and deduplicate its rows.\n\n\
                  Headers may be mis-encoded; they are repaired before matching."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values (names, dates, ids) to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the canonical fields columns can map to.
    Fields,

    /// Propose a column mapping for a CSV export.
    Map(MapArgs),

    /// Map, transform, validate and deduplicate a CSV export.
    Run(RunArgs),
}

/// Options shared by every command that reads an export.
#[derive(Args)]
pub struct InputArgs {
    /// Path to the CSV export.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Field delimiter (sniffed from the header line when omitted).
    #[arg(long = "delimiter", value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Import template (JSON) with fixed column mappings and transform options.
    #[arg(long = "template", value_name = "FILE")]
    pub template: Option<PathBuf>,
}

#[derive(Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also list unmapped columns and fields.
    #[arg(long = "show-unmapped")]
    pub show_unmapped: bool,

    /// Hide proposed mappings below this confidence level.
    #[arg(long = "min-level", value_enum, default_value = "low")]
    pub min_level: LevelArg,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the full result (mapping, issues, records, duplicates) as JSON.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Apply mappings that would normally need confirmation.
    ///
    /// By default only overrides and high-confidence mappings are used;
    /// columns with a weaker suggestion are kept as extension values.
    #[arg(long = "accept-suggestions")]
    pub accept_suggestions: bool,

    /// Interpretation of ambiguous numeric dates such as 03/04/2024.
    #[arg(long = "date-order", value_enum)]
    pub date_order: Option<DateOrderArg>,

    /// Store phone numbers with the area code folded into the subscriber.
    #[arg(long = "combined-phone")]
    pub combined_phone: bool,

    /// Reference date for age and follow-up checks (default: today).
    #[arg(long = "reference-date", value_name = "YYYY-MM-DD")]
    pub reference_date: Option<NaiveDate>,

    /// Maximum rows listed in the issue table.
    #[arg(long = "max-issues", default_value_t = 50)]
    pub max_issues: usize,

    /// Do not draw a progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Exit with status 1 when an issue at or above this severity is found.
    #[arg(
        long = "fail-on",
        value_name = "SEVERITY",
        default_value = "error",
        value_parser = parse_severity
    )]
    pub fail_on: Severity,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DateOrderArg {
    DayFirst,
    MonthFirst,
}

/// Confidence level choices for filtering the mapping table.
#[derive(Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Low,
    Medium,
    High,
}

impl From<LevelArg> for ConfidenceLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Low => Self::Low,
            LevelArg::Medium => Self::Medium,
            LevelArg::High => Self::High,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("expected a single ASCII character or 'tab', got '{value}'")),
        },
    }
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    Severity::parse(value)
        .ok_or_else(|| format!("expected error, warning or info, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("ß").is_err());
    }

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::try_parse_from([
            "intake",
            "run",
            "export.csv",
            "--delimiter",
            ";",
            "--reference-date",
            "2025-06-01",
            "--date-order",
            "month-first",
            "--accept-suggestions",
        ])
        .expect("valid arguments");
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.input.delimiter, Some(b';'));
        assert_eq!(args.reference_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(args.accept_suggestions);
        assert!(matches!(args.date_order, Some(DateOrderArg::MonthFirst)));
        assert_eq!(args.max_issues, 50);
        assert_eq!(args.fail_on, Severity::Error);
    }

    #[test]
    fn test_fail_on_accepts_severity_names() {
        let cli = Cli::try_parse_from(["intake", "run", "export.csv", "--fail-on", "Warning"])
            .expect("valid arguments");
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.fail_on, Severity::Warning);
        assert!(Cli::try_parse_from(["intake", "run", "export.csv", "--fail-on", "fatal"]).is_err());
    }

    #[test]
    fn test_map_min_level() {
        let cli = Cli::try_parse_from(["intake", "map", "export.csv", "--min-level", "medium"])
            .expect("valid arguments");
        let Command::Map(args) = cli.command else {
            panic!("expected map command");
        };
        assert_eq!(ConfidenceLevel::from(args.min_level), ConfidenceLevel::Medium);
    }
}
