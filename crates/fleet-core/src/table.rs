use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::columns;
use crate::error::SchemaError;

// ── Record ────────────────────────────────────────────────────────────────────

/// A single telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Vehicle identifier; many records share one.
    pub vehicle_id: String,
    /// Where the sample was taken.
    pub location: String,
    /// UTC time of the sample.
    pub timestamp: DateTime<Utc>,
    pub speed_mph: f64,
    pub rpm: f64,
    pub fuel_consumption_mpg: f64,
    pub engine_temp_f: f64,
    /// Odometer reading (cumulative), not a per-sample delta.
    pub distance_miles: f64,
}

// ── ColumnData ────────────────────────────────────────────────────────────────

/// The typed values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<String>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Timestamp(Vec<DateTime<Utc>>),
}

impl ColumnData {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name used in schema errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Text(_) => "text",
            ColumnData::Float(_) => "float",
            ColumnData::Bool(_) => "bool",
            ColumnData::Timestamp(_) => "timestamp",
        }
    }

    /// Keep the cells whose `mask` entry is `true`, preserving order.
    fn select(&self, mask: &[bool]) -> ColumnData {
        fn pick<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| v.clone())
                .collect()
        }
        match self {
            ColumnData::Text(v) => ColumnData::Text(pick(v, mask)),
            ColumnData::Float(v) => ColumnData::Float(pick(v, mask)),
            ColumnData::Bool(v) => ColumnData::Bool(pick(v, mask)),
            ColumnData::Timestamp(v) => ColumnData::Timestamp(pick(v, mask)),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// An ordered, columnar collection of rows sharing one schema.
///
/// The schema is not fixed: a table may carry any set of columns, and each
/// transform checks for the columns it needs when it runs. Tables are
/// immutable once built; every transform returns a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    len: usize,
}

impl Table {
    /// An empty table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `data` under `name`, replacing a column of the same name in place.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        data: ColumnData,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if !self.columns.is_empty() && data.len() != self.len {
            return Err(SchemaError::LengthMismatch {
                column: name,
                expected: self.len,
                found: data.len(),
            });
        }
        self.len = data.len();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.data = data,
            None => self.columns.push(Column { name, data }),
        }
        Ok(self)
    }

    /// Build the canonical eight-column table from typed records.
    pub fn from_records(records: &[Record]) -> Self {
        let floats = |f: fn(&Record) -> f64| ColumnData::Float(records.iter().map(f).collect());

        let columns = vec![
            (
                columns::VEHICLE_ID,
                ColumnData::Text(records.iter().map(|r| r.vehicle_id.clone()).collect()),
            ),
            (
                columns::LOCATION,
                ColumnData::Text(records.iter().map(|r| r.location.clone()).collect()),
            ),
            (
                columns::TIMESTAMP,
                ColumnData::Timestamp(records.iter().map(|r| r.timestamp).collect()),
            ),
            (columns::SPEED_MPH, floats(|r| r.speed_mph)),
            (columns::RPM, floats(|r| r.rpm)),
            (columns::FUEL_CONSUMPTION_MPG, floats(|r| r.fuel_consumption_mpg)),
            (columns::ENGINE_TEMP_F, floats(|r| r.engine_temp_f)),
            (columns::DISTANCE_MILES, floats(|r| r.distance_miles)),
        ];

        Table {
            columns: columns
                .into_iter()
                .map(|(name, data)| Column {
                    name: name.to_string(),
                    data,
                })
                .collect(),
            len: records.len(),
        }
    }

    /// Convert back to typed records. Extra columns are ignored.
    pub fn to_records(&self) -> Result<Vec<Record>, SchemaError> {
        let vehicle_ids = self.text(columns::VEHICLE_ID)?;
        let locations = self.text(columns::LOCATION)?;
        let timestamps = self.timestamp(columns::TIMESTAMP)?;
        let speed = self.float(columns::SPEED_MPH)?;
        let rpm = self.float(columns::RPM)?;
        let fuel = self.float(columns::FUEL_CONSUMPTION_MPG)?;
        let temp = self.float(columns::ENGINE_TEMP_F)?;
        let distance = self.float(columns::DISTANCE_MILES)?;

        Ok((0..self.len)
            .map(|i| Record {
                vehicle_id: vehicle_ids[i].clone(),
                location: locations[i].clone(),
                timestamp: timestamps[i],
                speed_mph: speed[i],
                rpm: rpm[i],
                fuel_consumption_mpg: fuel[i],
                engine_temp_f: temp[i],
                distance_miles: distance[i],
            })
            .collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn text(&self, name: &str) -> Result<&[String], SchemaError> {
        match self.require(name)? {
            ColumnData::Text(v) => Ok(v),
            other => Err(mismatch(name, "text", other)),
        }
    }

    pub fn float(&self, name: &str) -> Result<&[f64], SchemaError> {
        match self.require(name)? {
            ColumnData::Float(v) => Ok(v),
            other => Err(mismatch(name, "float", other)),
        }
    }

    pub fn bool(&self, name: &str) -> Result<&[bool], SchemaError> {
        match self.require(name)? {
            ColumnData::Bool(v) => Ok(v),
            other => Err(mismatch(name, "bool", other)),
        }
    }

    pub fn timestamp(&self, name: &str) -> Result<&[DateTime<Utc>], SchemaError> {
        match self.require(name)? {
            ColumnData::Timestamp(v) => Ok(v),
            other => Err(mismatch(name, "timestamp", other)),
        }
    }

    /// Keep the rows whose `mask` entry is `true`, in their original order,
    /// with every column carried over.
    pub fn select_rows(&self, mask: &[bool]) -> Table {
        debug_assert_eq!(mask.len(), self.len, "row mask length must match table");
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data: c.data.select(mask),
                })
                .collect(),
            len: mask.iter().take(self.len).filter(|keep| **keep).count(),
        }
    }

    /// Sorted distinct values of a text column, e.g. to populate a selector.
    pub fn unique_text(&self, name: &str) -> Result<Vec<String>, SchemaError> {
        let values: BTreeSet<&String> = self.text(name)?.iter().collect();
        Ok(values.into_iter().cloned().collect())
    }

    /// Earliest and latest `timestamp`, or `None` for an empty table.
    pub fn time_bounds(&self) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, SchemaError> {
        let ts = self.timestamp(columns::TIMESTAMP)?;
        let min = ts.iter().min().copied();
        let max = ts.iter().max().copied();
        Ok(min.zip(max))
    }

    fn require(&self, name: &str) -> Result<&ColumnData, SchemaError> {
        self.column(name)
            .map(|c| &c.data)
            .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
    }
}

fn mismatch(name: &str, expected: &'static str, found: &ColumnData) -> SchemaError {
    SchemaError::TypeMismatch {
        column: name.to_string(),
        expected,
        found: found.type_name(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
