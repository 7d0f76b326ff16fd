use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a telemetry file into a [`Table`](crate::table::Table).
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited file itself is malformed (ragged rows, bad quoting, ...).
    #[error("Failed to parse CSV: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// The header row has no `timestamp` column.
    #[error("Missing timestamp column")]
    MissingTimestamp,

    /// A `timestamp` cell did not match any recognised format.
    /// `row` is the 1-based data row (the header is not counted).
    #[error("Invalid timestamp format at row {row}: {value:?}")]
    TimestampParse { row: usize, value: String },

    /// The parsed columns could not be assembled into one table.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A transform was handed a table that lacks a column it needs, or holds it
/// with the wrong type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Column {column} has type {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Column {column} has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

/// Failure while re-serializing a table.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// All errors produced across the fleet telemetry crates.
#[derive(Error, Debug)]
pub enum FleetError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// A configuration value or file is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the fleet crates.
pub type Result<T> = std::result::Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LoadError::FileRead {
            path: PathBuf::from("/data/telemetry.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/telemetry.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = LoadError::TimestampParse {
            row: 3,
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid timestamp format at row 3: \"yesterday\"");
    }

    #[test]
    fn test_error_display_missing_timestamp() {
        assert_eq!(LoadError::MissingTimestamp.to_string(), "Missing timestamp column");
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = SchemaError::MissingColumn("rpm".to_string());
        assert_eq!(err.to_string(), "Missing column: rpm");
    }

    #[test]
    fn test_error_display_type_mismatch() {
        let err = SchemaError::TypeMismatch {
            column: "speed_mph".to_string(),
            expected: "float",
            found: "text",
        };
        assert_eq!(err.to_string(), "Column speed_mph has type text, expected float");
    }

    #[test]
    fn test_error_display_config() {
        let err = FleetError::Config("bad thresholds".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad thresholds");
    }

    #[test]
    fn test_fleet_error_from_schema() {
        let err: FleetError = SchemaError::MissingColumn("location".to_string()).into();
        assert!(matches!(err, FleetError::Schema(_)));
        assert_eq!(err.to_string(), "Missing column: location");
    }

    #[test]
    fn test_fleet_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FleetError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
