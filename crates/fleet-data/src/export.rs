//! Write a [`Table`] back out as CSV in the format the loader reads.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use fleet_core::error::ExportError;
use fleet_core::table::{ColumnData, Table};
use fleet_core::time_utils::format_timestamp;
use tracing::debug;

/// Serialize `table` to `writer`: a header row, then one record per row.
///
/// Floats use the shortest representation that reads back to the same
/// value; `NaN` becomes an empty cell.
///
/// Loading the output gives back an equal table for the canonical record
/// columns. Other columns are re-typed by the loader from their text alone:
/// a bool column comes back as text, and a text column whose cells are all
/// empty comes back as a float column of `NaN`.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.column_names())?;

    let mut row = Vec::with_capacity(table.columns().len());
    for i in 0..table.len() {
        row.clear();
        row.extend(table.columns().iter().map(|c| cell(c.data(), i)));
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize `table` into an in-memory string.
pub fn to_csv_string(table: &Table) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Serialize `table` to the file at `path`, creating or truncating it.
pub fn save_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(table, file)?;
    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn cell(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Text(v) => v[row].clone(),
        ColumnData::Float(v) if v[row].is_nan() => String::new(),
        ColumnData::Float(v) => v[row].to_string(),
        ColumnData::Bool(v) => v[row].to_string(),
        ColumnData::Timestamp(v) => format_timestamp(&v[row]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_from_reader;
    use crate::metrics::identify_anomalies;
    use chrono::{TimeZone, Utc};
    use fleet_core::table::Record;

    fn sample() -> Table {
        Table::from_records(&[
            Record {
                vehicle_id: "V1".to_string(),
                location: "New York, NY".to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
                speed_mph: 60.0,
                rpm: 2000.0,
                fuel_consumption_mpg: 25.5,
                engine_temp_f: 180.25,
                distance_miles: 10.1,
            },
            Record {
                vehicle_id: "007".to_string(),
                location: "LA".to_string(),
                timestamp: Utc
                    .with_ymd_and_hms(2024, 1, 1, 10, 30, 0)
                    .unwrap()
                    .checked_add_signed(chrono::Duration::milliseconds(250))
                    .unwrap(),
                speed_mph: 0.0,
                rpm: 750.0,
                fuel_consumption_mpg: 1.0 / 3.0,
                engine_temp_f: 175.0,
                distance_miles: 5.0,
            },
        ])
    }

    #[test]
    fn test_to_csv_string_format() {
        let csv = to_csv_string(&sample()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("vehicle_id,location,timestamp,speed_mph,rpm,fuel_consumption_mpg,engine_temp_f,distance_miles")
        );
        assert_eq!(
            lines.next(),
            Some("V1,\"New York, NY\",2024-01-01 10:00:00,60,2000,25.5,180.25,10.1")
        );
        assert!(lines.next().unwrap().contains("2024-01-01 10:30:00.250"));
    }

    #[test]
    fn test_round_trip_through_loader() {
        let table = sample();
        let csv = to_csv_string(&table).unwrap();
        let reloaded = load_from_reader(csv.as_bytes(), "round-trip").unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_nan_written_as_empty_cell() {
        let table = Table::new()
            .with_column("speed_mph", ColumnData::Float(vec![f64::NAN, 12.5]))
            .unwrap();
        assert_eq!(to_csv_string(&table).unwrap(), "speed_mph\n\"\"\n12.5\n");
    }

    #[test]
    fn test_extra_columns_are_retyped_on_reload() {
        let table = sample()
            .with_column("driver", ColumnData::Text(vec![String::new(), String::new()]))
            .unwrap()
            .with_column("parked", ColumnData::Bool(vec![false, true]))
            .unwrap();
        let csv = to_csv_string(&table).unwrap();
        let reloaded = load_from_reader(csv.as_bytes(), "extra").unwrap();

        let driver = reloaded.column("driver").unwrap().data();
        assert_eq!(driver.type_name(), "float");
        assert!(reloaded.float("driver").unwrap().iter().all(|v| v.is_nan()));
        assert_eq!(reloaded.text("parked").unwrap(), &["false", "true"]);
        // the record columns still match
        assert_eq!(reloaded.to_records().unwrap(), table.to_records().unwrap());
    }

    #[test]
    fn test_bool_columns() {
        let flagged = identify_anomalies(&sample()).unwrap();
        let csv = to_csv_string(&flagged).unwrap();
        let header = csv.lines().next().unwrap();

        assert!(header.ends_with("high_temp,low_efficiency,high_rpm"));
        assert!(csv.lines().nth(2).unwrap().ends_with("false,true,false"));
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let empty = Table::from_records(&[]);
        let csv = to_csv_string(&empty).unwrap();
        assert_eq!(csv.lines().count(), 1);

        let reloaded = load_from_reader(csv.as_bytes(), "empty").unwrap();
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.column_names(), empty.column_names());
    }

    #[test]
    fn test_save_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        save_csv(&sample(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_csv_string(&sample()).unwrap());
    }

    #[test]
    fn test_save_csv_bad_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(save_csv(&sample(), &path), Err(ExportError::Io(_))));
    }
}
