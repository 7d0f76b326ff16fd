//! Core types for the fleet telemetry pipeline.
//!
//! Holds the columnar [`table::Table`] model, the error taxonomy, timestamp
//! parsing and bucketing, the anomaly/efficiency constants and the CLI
//! settings shared by the binary.

pub mod columns;
pub mod error;
pub mod formatting;
pub mod settings;
pub mod table;
pub mod thresholds;
pub mod time_utils;

pub use error::{ExportError, FleetError, LoadError, SchemaError};
pub use table::{Column, ColumnData, Record, Table};
pub use time_utils::TimeBucket;
