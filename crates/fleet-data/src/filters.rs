//! Row filters over a telemetry [`Table`].
//!
//! Each filter is a pure function that returns a new table holding a subset
//! of the input rows, in their original order, with every column intact.
//! An empty selector list means "no filter", never "match nothing".

use chrono::{DateTime, NaiveDate, Utc};
use fleet_core::columns::{LOCATION, TIMESTAMP, VEHICLE_ID};
use fleet_core::error::SchemaError;
use fleet_core::table::Table;
use fleet_core::time_utils::{end_of_day, start_of_day};
use tracing::debug;

// ── Single-column filters ─────────────────────────────────────────────────────

/// Keep rows whose `vehicle_id` is one of `ids`.
///
/// An empty `ids` returns the table unchanged.
pub fn filter_by_vehicle<S: AsRef<str>>(table: &Table, ids: &[S]) -> Result<Table, SchemaError> {
    filter_by_membership(table, VEHICLE_ID, ids)
}

/// Keep rows whose `location` is one of `locations`.
///
/// An empty `locations` returns the table unchanged.
pub fn filter_by_location<S: AsRef<str>>(
    table: &Table,
    locations: &[S],
) -> Result<Table, SchemaError> {
    filter_by_membership(table, LOCATION, locations)
}

/// Keep rows with `start <= timestamp <= end`.
///
/// Both ends are inclusive and taken literally: callers that want a whole
/// end day must pass its last instant (see [`end_of_day`]).
pub fn filter_by_date_range(
    table: &Table,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Table, SchemaError> {
    let mask: Vec<bool> = table
        .timestamp(TIMESTAMP)?
        .iter()
        .map(|ts| start <= *ts && *ts <= end)
        .collect();
    Ok(table.select_rows(&mask))
}

fn filter_by_membership<S: AsRef<str>>(
    table: &Table,
    column: &str,
    selected: &[S],
) -> Result<Table, SchemaError> {
    if selected.is_empty() {
        return Ok(table.clone());
    }
    let mask: Vec<bool> = table
        .text(column)?
        .iter()
        .map(|value| selected.iter().any(|s| s.as_ref() == value.as_str()))
        .collect();
    Ok(table.select_rows(&mask))
}

// ── FilterSelection ───────────────────────────────────────────────────────────

/// A user's combined choice of vehicles, locations and calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub vehicles: Vec<String>,
    pub locations: Vec<String>,
    /// First day to include, from midnight.
    pub start_date: Option<NaiveDate>,
    /// Last day to include, through 23:59:59.
    pub end_date: Option<NaiveDate>,
}

/// Apply vehicle, location and date filters in turn.
///
/// The end date is widened to the end of that day so the whole day is
/// included. A missing bound leaves that side of the range open.
pub fn apply_filters(table: &Table, selection: &FilterSelection) -> Result<Table, SchemaError> {
    let mut filtered = filter_by_vehicle(table, &selection.vehicles)?;
    filtered = filter_by_location(&filtered, &selection.locations)?;

    if selection.start_date.is_some() || selection.end_date.is_some() {
        let start = selection
            .start_date
            .map(start_of_day)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = selection
            .end_date
            .map(end_of_day)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        filtered = filter_by_date_range(&filtered, start, end)?;
    }

    debug!("Filters kept {} of {} rows", filtered.len(), table.len());
    Ok(filtered)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fleet_core::table::{ColumnData, Record};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn record(vehicle: &str, location: &str, ts: DateTime<Utc>) -> Record {
        Record {
            vehicle_id: vehicle.to_string(),
            location: location.to_string(),
            timestamp: ts,
            speed_mph: 50.0,
            rpm: 2000.0,
            fuel_consumption_mpg: 28.0,
            engine_temp_f: 190.0,
            distance_miles: 10.0,
        }
    }

    fn fleet() -> Table {
        Table::from_records(&[
            record("V1", "NYC", day(1)),
            record("V2", "LA", day(2)),
            record("V3", "SF", day(3)),
            record("V1", "LA", day(4)),
        ])
    }

    // ── filter_by_vehicle ─────────────────────────────────────────────────────

    #[test]
    fn test_filter_by_vehicle_basic() {
        let result = filter_by_vehicle(&fleet(), &["V1", "V3"]).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.text("vehicle_id").unwrap(), &["V1", "V3", "V1"]);
    }

    #[test]
    fn test_filter_by_vehicle_empty_selection_is_identity() {
        let table = fleet();
        let none: [&str; 0] = [];
        assert_eq!(filter_by_vehicle(&table, &none).unwrap(), table);
    }

    #[test]
    fn test_filter_by_vehicle_no_match() {
        let result = filter_by_vehicle(&fleet(), &["V9"]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.column_names(), fleet().column_names());
    }

    #[test]
    fn test_filter_by_vehicle_accepts_owned_strings() {
        let ids = vec!["V2".to_string()];
        assert_eq!(filter_by_vehicle(&fleet(), &ids).unwrap().len(), 1);
    }

    #[test]
    fn test_filter_by_vehicle_missing_column() {
        let table = Table::new()
            .with_column("value", ColumnData::Float(vec![1.0]))
            .unwrap();
        let err = filter_by_vehicle(&table, &["V1"]).unwrap_err();
        assert_eq!(err, SchemaError::MissingColumn("vehicle_id".to_string()));
    }

    #[test]
    fn test_empty_selection_skips_column_check() {
        let table = Table::new()
            .with_column("value", ColumnData::Float(vec![1.0]))
            .unwrap();
        let none: [&str; 0] = [];
        assert_eq!(filter_by_vehicle(&table, &none).unwrap(), table);
    }

    // ── filter_by_location ────────────────────────────────────────────────────

    #[test]
    fn test_filter_by_location_basic() {
        let result = filter_by_location(&fleet(), &["NYC", "SF"]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.text("location").unwrap(), &["NYC", "SF"]);
    }

    #[test]
    fn test_filter_by_location_empty_selection_is_identity() {
        let table = fleet();
        let none: Vec<String> = Vec::new();
        assert_eq!(filter_by_location(&table, &none).unwrap(), table);
    }

    // ── filter_by_date_range ──────────────────────────────────────────────────

    #[test]
    fn test_filter_by_date_range_inclusive_both_ends() {
        let table = Table::from_records(&[
            record("V1", "NYC", day(1)),
            record("V1", "NYC", day(5)),
            record("V1", "NYC", day(10)),
        ]);
        let result = filter_by_date_range(&table, day(1), day(5)).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.timestamp("timestamp").unwrap(), &[day(1), day(5)]);
    }

    #[test]
    fn test_filter_by_date_range_no_calendar_adjustment() {
        let noon = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        let table = Table::from_records(&[record("V1", "NYC", noon)]);
        // end = 2024-01-05 00:00 excludes later that day
        assert!(filter_by_date_range(&table, day(1), day(5)).unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_date_range_inverted_is_empty() {
        let result = filter_by_date_range(&fleet(), day(4), day(1)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let table = fleet();
        let before = table.clone();
        let _ = filter_by_date_range(&table, day(2), day(3)).unwrap();
        let _ = filter_by_vehicle(&table, &["V1"]).unwrap();
        assert_eq!(table, before);
    }

    // ── apply_filters ─────────────────────────────────────────────────────────

    #[test]
    fn test_apply_filters_whole_end_day() {
        let late = Utc.with_ymd_and_hms(2024, 1, 3, 23, 30, 0).unwrap();
        let table = Table::from_records(&[
            record("V1", "NYC", day(1)),
            record("V1", "NYC", late),
            record("V1", "NYC", day(4)),
        ]);
        let selection = FilterSelection {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3),
            ..Default::default()
        };
        let result = apply_filters(&table, &selection).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_apply_filters_combines_all() {
        let selection = FilterSelection {
            vehicles: vec!["V1".to_string(), "V2".to_string()],
            locations: vec!["LA".to_string()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 3),
            end_date: None,
        };
        let result = apply_filters(&fleet(), &selection).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.text("vehicle_id").unwrap(), &["V1"]);
        assert_eq!(result.timestamp("timestamp").unwrap(), &[day(4)]);
    }

    #[test]
    fn test_apply_filters_default_is_identity() {
        let table = fleet();
        assert_eq!(apply_filters(&table, &FilterSelection::default()).unwrap(), table);
    }
}
