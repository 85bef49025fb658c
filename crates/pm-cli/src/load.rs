//! Event log loading.
//!
//! Turns CSV, JSON Lines or JSON files into loader rows. Columns are
//! order-mapped: the first three are case ID, activity and timestamp,
//! whatever their header says. Row indices in validation errors count data
//! rows from 0; the file line is added alongside when the format has one.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use pm_core::{EventLog, RawEvent};
use serde_json::Value;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// One JSON row per line.
    Jsonl,
    /// A JSON array of rows.
    Json,
}

impl InputFormat {
    /// Infers the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A loader row and the 1-based file line it was read from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub line: Option<u64>,
    pub event: RawEvent,
}

/// Reads and validates an event log file.
pub fn load_event_log(path: &Path, format: Option<InputFormat>) -> Result<EventLog> {
    let Some(format) = format.or_else(|| InputFormat::from_path(path)) else {
        bail!(
            "cannot infer input format of {}; pass --format csv|jsonl|json",
            path.display()
        );
    };

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let rows = match format {
        InputFormat::Csv => read_csv(file)?,
        InputFormat::Jsonl => read_json_lines(BufReader::new(file))?,
        InputFormat::Json => read_json(BufReader::new(file))?,
    };
    tracing::debug!(path = %path.display(), ?format, rows = rows.len(), "loaded rows");

    let lines: Vec<Option<u64>> = rows.iter().map(|r| r.line).collect();
    let log = EventLog::from_raw(rows.into_iter().map(|r| r.event)).map_err(|err| {
        let location = lines
            .get(err.row)
            .copied()
            .flatten()
            .map_or_else(String::new, |line| format!(" at line {line}"));
        anyhow::Error::new(err).context(format!("invalid event log {}{location}", path.display()))
    })?;
    Ok(log)
}

/// Reads CSV rows, mapping the first three columns by position.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<SourceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = reader.headers().context("failed to read CSV header")?.len();
    if columns < 3 {
        bail!("expected at least 3 CSV columns (case ID, activity, timestamp), found {columns}");
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV row {idx}"))?;
        let column = |i: usize| record.get(i).map(str::to_string);
        rows.push(SourceRow {
            line: record.position().map(csv::Position::line),
            event: RawEvent {
                case_id: column(0),
                activity: column(1),
                timestamp: column(2),
            },
        });
    }
    Ok(rows)
}

/// Reads one JSON row per non-blank line.
///
/// Blank lines are skipped; each row keeps its file line number.
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<SourceRow>> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(trimmed).with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        let event = raw_from_value(value).with_context(|| format!("invalid row on line {}", idx + 1))?;
        rows.push(SourceRow {
            line: u64::try_from(idx + 1).ok(),
            event,
        });
    }
    Ok(rows)
}

/// Reads a JSON array of rows.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<SourceRow>> {
    let values: Vec<Value> = serde_json::from_reader(reader).context("expected a JSON array of rows")?;
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let event = raw_from_value(value).with_context(|| format!("invalid row {idx}"))?;
            Ok(SourceRow { line: None, event })
        })
        .collect()
}

/// Renders a scalar cell as text; `null` counts as absent.
fn scalar(value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => bail!("expected a scalar cell, found {value}"),
    }
}

/// Converts a 3-element array or a keyed object into a loader row.
fn raw_from_value(value: Value) -> Result<RawEvent> {
    match value {
        Value::Array(cells) => {
            let mut cells = cells.into_iter();
            let mut next = || cells.next().map_or(Ok(None), scalar);
            Ok(RawEvent {
                case_id: next()?,
                activity: next()?,
                timestamp: next()?,
            })
        }
        Value::Object(mut map) => {
            let mut take = |keys: &[&str]| {
                keys.iter()
                    .find_map(|k| map.remove(*k))
                    .map_or(Ok(None), scalar)
            };
            Ok(RawEvent {
                case_id: take(&["case_id", "CaseID", "case"])?,
                activity: take(&["activity", "Activity"])?,
                timestamp: take(&["timestamp", "Timestamp", "time"])?,
            })
        }
        other => bail!("expected an array or object row, found {other}"),
    }
}
