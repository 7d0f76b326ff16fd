//! CSV loading for telemetry record files.
//!
//! Reads a delimited file with a header row into a columnar [`Table`]. The
//! `timestamp` column is parsed eagerly; every other column is typed by
//! inspection, and no schema validation happens here. Missing sensor columns
//! surface later as [`SchemaError`](fleet_core::SchemaError)s from the
//! transforms that need them.

use std::io::Read;
use std::path::Path;

use fleet_core::columns::{TEXT_COLUMNS, TIMESTAMP};
use fleet_core::error::LoadError;
use fleet_core::table::{ColumnData, Table};
use fleet_core::time_utils::parse_timestamp;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a telemetry CSV file from disk.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| {
        warn!("Failed to read file {}: {}", path.display(), source);
        LoadError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    })?;

    load_from_reader(file, &path.display().to_string())
}

/// Load telemetry CSV from any reader. `source_name` is only used in logs.
pub fn load_from_reader<R: Read>(reader: R, source_name: &str) -> Result<Table, LoadError> {
    let result = read_table(reader);
    match &result {
        Ok(table) => debug!(
            "Loaded {} rows x {} columns from {}",
            table.len(),
            table.columns().len(),
            source_name
        ),
        Err(e) => warn!("Failed to load {}: {}", source_name, e),
    }
    result
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_table<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if !headers.iter().any(|h| h == TIMESTAMP) {
        return Err(LoadError::MissingTimestamp);
    }

    // Gather raw cells column-wise; the csv reader rejects ragged rows.
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in csv_reader.records() {
        let record = record?;
        for (col, value) in record.iter().enumerate() {
            cells[col].push(value.to_string());
        }
    }

    let mut table = Table::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        let data = if name == TIMESTAMP {
            parse_timestamp_column(&raw)?
        } else if TEXT_COLUMNS.contains(&name.as_str()) {
            ColumnData::Text(raw)
        } else {
            infer_column(raw)
        };
        table = table.with_column(name, data)?;
    }

    Ok(table)
}

fn parse_timestamp_column(raw: &[String]) -> Result<ColumnData, LoadError> {
    raw.iter()
        .enumerate()
        .map(|(i, value)| {
            parse_timestamp(value).ok_or_else(|| LoadError::TimestampParse {
                row: i + 1,
                value: value.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ColumnData::Timestamp)
}

/// A column is numeric when every non-empty cell parses as `f64`; empty
/// cells become `NaN`. Anything else stays text.
fn infer_column(raw: Vec<String>) -> ColumnData {
    let parsed: Option<Vec<f64>> = raw
        .iter()
        .map(|s| {
            if s.is_empty() {
                Some(f64::NAN)
            } else {
                s.parse::<f64>().ok()
            }
        })
        .collect();

    match parsed {
        Some(values) => ColumnData::Float(values),
        None => ColumnData::Text(raw),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
