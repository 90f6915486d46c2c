//! Reading delimited exports into headers and rows.
//!
//! Bytes are decoded as UTF-8 with replacement so mis-encoded headers reach
//! the header normalizer intact enough to be repaired.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::UTF_8;
use tracing::{debug, info, warn};

/// Delimiters tried when none is given, in order of preference on ties.
const CANDIDATE_DELIMITERS: &[u8] = b";,\t|";

/// Headers and data rows of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub delimiter: u8,
    /// Some bytes were not valid UTF-8 and were replaced.
    pub had_replacements: bool,
}

/// Read and parse `path`, sniffing the delimiter unless given.
pub fn read_table(path: &Path, delimiter: Option<u8>) -> Result<InputTable> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let (text, had_replacements) = decode(&bytes);
    if had_replacements {
        warn!(
            path = %path.display(),
            "input is not valid UTF-8; invalid bytes were replaced"
        );
    }
    let mut table = parse_table(&text, delimiter)
        .with_context(|| format!("parse {}", path.display()))?;
    table.had_replacements = had_replacements;
    info!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        delimiter = %char::from(table.delimiter),
        "loaded input table"
    );
    Ok(table)
}

/// Decode bytes as UTF-8, dropping a BOM and replacing invalid sequences.
pub fn decode(bytes: &[u8]) -> (String, bool) {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    (text.into_owned(), had_errors)
}

/// Parse delimited text with a header line.
///
/// Short rows are padded with empty cells so every row has one value per
/// header.
pub fn parse_table(text: &str, delimiter: Option<u8>) -> Result<InputTable> {
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(text));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("read header line")?
        .iter()
        .map(ToString::to_string)
        .collect();
    if headers.iter().all(|header| header.trim().is_empty()) {
        bail!("input has no header line");
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read data row {}", index + 1))?;
        let mut row: Vec<String> = record.iter().map(ToString::to_string).collect();
        if row.len() > headers.len() {
            debug!(
                row = index + 1,
                cells = row.len(),
                columns = headers.len(),
                "extra cells ignored"
            );
            row.truncate(headers.len());
        }
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(InputTable {
        headers,
        rows,
        delimiter,
        had_replacements: false,
    })
}

/// Pick the candidate delimiter that occurs most often in the header line.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header_line = text.lines().next().unwrap_or_default();
    let mut best = (b',', 0);
    for &candidate in CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|b| *b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}
