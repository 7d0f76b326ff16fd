//! Group-by aggregation of telemetry, per vehicle and per time bucket.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fleet_core::columns::{
    DISTANCE_MILES, DISTANCE_MILES_MAX, ENGINE_TEMP_F, ENGINE_TEMP_F_MEAN, FUEL_CONSUMPTION_MPG,
    FUEL_CONSUMPTION_MPG_MEAN, LOCATION, LOCATION_FIRST, RPM, RPM_MEAN, SPEED_MPH, SPEED_MPH_MAX,
    SPEED_MPH_MEAN, SPEED_MPH_MIN, TIMESTAMP, VEHICLE_ID,
};
use fleet_core::error::SchemaError;
use fleet_core::table::{ColumnData, Table};
use fleet_core::time_utils::TimeBucket;
use tracing::debug;

use crate::stats;

// ── By vehicle ────────────────────────────────────────────────────────────────

/// Rows belonging to one vehicle, plus the first location seen for it.
struct VehicleGroup<'a> {
    location_first: &'a str,
    rows: Vec<usize>,
}

/// One summary row per distinct `vehicle_id`, sorted by id.
///
/// Columns: `vehicle_id`, `speed_mph_mean`, `speed_mph_max`, `speed_mph_min`,
/// `fuel_consumption_mpg_mean`, `engine_temp_f_mean`, `rpm_mean`,
/// `distance_miles_max`, `location_first`. `location_first` is the location
/// of the vehicle's earliest row in input order. An empty input yields an
/// empty table with the same columns.
pub fn aggregate_by_vehicle(table: &Table) -> Result<Table, SchemaError> {
    let vehicle_ids = table.text(VEHICLE_ID)?;
    let speed = table.float(SPEED_MPH)?;
    let fuel = table.float(FUEL_CONSUMPTION_MPG)?;
    let temp = table.float(ENGINE_TEMP_F)?;
    let rpm = table.float(RPM)?;
    let distance = table.float(DISTANCE_MILES)?;
    let locations = table.text(LOCATION)?;

    let mut groups: BTreeMap<&str, VehicleGroup<'_>> = BTreeMap::new();
    for (i, id) in vehicle_ids.iter().enumerate() {
        groups
            .entry(id.as_str())
            .or_insert_with(|| VehicleGroup {
                location_first: locations[i].as_str(),
                rows: Vec::new(),
            })
            .rows
            .push(i);
    }

    let n = groups.len();
    let mut out_ids = Vec::with_capacity(n);
    let mut speed_mean = Vec::with_capacity(n);
    let mut speed_max = Vec::with_capacity(n);
    let mut speed_min = Vec::with_capacity(n);
    let mut fuel_mean = Vec::with_capacity(n);
    let mut temp_mean = Vec::with_capacity(n);
    let mut rpm_mean = Vec::with_capacity(n);
    let mut distance_max = Vec::with_capacity(n);
    let mut location_first = Vec::with_capacity(n);

    for (id, group) in &groups {
        let pick = |col: &[f64]| group.rows.iter().map(|&i| col[i]).collect::<Vec<f64>>();
        let speeds = pick(speed);

        out_ids.push(id.to_string());
        speed_mean.push(stats::mean(speeds.iter().copied()).unwrap_or(f64::NAN));
        speed_max.push(stats::max(speeds.iter().copied()));
        speed_min.push(stats::min(speeds.iter().copied()));
        fuel_mean.push(stats::mean(pick(fuel)).unwrap_or(f64::NAN));
        temp_mean.push(stats::mean(pick(temp)).unwrap_or(f64::NAN));
        rpm_mean.push(stats::mean(pick(rpm)).unwrap_or(f64::NAN));
        distance_max.push(stats::max(pick(distance)));
        location_first.push(group.location_first.to_string());
    }

    debug!("Aggregated {} rows into {} vehicles", table.len(), n);

    Table::new()
        .with_column(VEHICLE_ID, ColumnData::Text(out_ids))?
        .with_column(SPEED_MPH_MEAN, ColumnData::Float(speed_mean))?
        .with_column(SPEED_MPH_MAX, ColumnData::Float(speed_max))?
        .with_column(SPEED_MPH_MIN, ColumnData::Float(speed_min))?
        .with_column(FUEL_CONSUMPTION_MPG_MEAN, ColumnData::Float(fuel_mean))?
        .with_column(ENGINE_TEMP_F_MEAN, ColumnData::Float(temp_mean))?
        .with_column(RPM_MEAN, ColumnData::Float(rpm_mean))?
        .with_column(DISTANCE_MILES_MAX, ColumnData::Float(distance_max))?
        .with_column(LOCATION_FIRST, ColumnData::Text(location_first))
}

// ── By time ───────────────────────────────────────────────────────────────────

/// Per-vehicle means of the sensor readings over fixed time buckets.
///
/// Rows are grouped by (`vehicle_id`, bucket start). Only buckets that hold
/// at least one row appear; gaps are not zero-filled. Output columns keep
/// their input names: `vehicle_id`, `timestamp` (the bucket start),
/// `speed_mph`, `fuel_consumption_mpg`, `engine_temp_f`, `rpm`. Rows are
/// ordered by vehicle, then by time.
pub fn aggregate_by_time(table: &Table, bucket: TimeBucket) -> Result<Table, SchemaError> {
    let vehicle_ids = table.text(VEHICLE_ID)?;
    let timestamps = table.timestamp(TIMESTAMP)?;
    let speed = table.float(SPEED_MPH)?;
    let fuel = table.float(FUEL_CONSUMPTION_MPG)?;
    let temp = table.float(ENGINE_TEMP_F)?;
    let rpm = table.float(RPM)?;

    let mut groups: BTreeMap<(&str, DateTime<Utc>), Vec<usize>> = BTreeMap::new();
    for (i, (id, ts)) in vehicle_ids.iter().zip(timestamps).enumerate() {
        groups
            .entry((id.as_str(), bucket.floor(*ts)))
            .or_default()
            .push(i);
    }

    let n = groups.len();
    let mut out_ids = Vec::with_capacity(n);
    let mut out_ts = Vec::with_capacity(n);
    let mut speed_mean = Vec::with_capacity(n);
    let mut fuel_mean = Vec::with_capacity(n);
    let mut temp_mean = Vec::with_capacity(n);
    let mut rpm_mean = Vec::with_capacity(n);

    for ((id, start), rows) in &groups {
        let mean_of =
            |col: &[f64]| stats::mean(rows.iter().map(|&i| col[i])).unwrap_or(f64::NAN);

        out_ids.push(id.to_string());
        out_ts.push(*start);
        speed_mean.push(mean_of(speed));
        fuel_mean.push(mean_of(fuel));
        temp_mean.push(mean_of(temp));
        rpm_mean.push(mean_of(rpm));
    }

    debug!(
        "Aggregated {} rows into {} {}-buckets",
        table.len(),
        n,
        bucket
    );

    Table::new()
        .with_column(VEHICLE_ID, ColumnData::Text(out_ids))?
        .with_column(TIMESTAMP, ColumnData::Timestamp(out_ts))?
        .with_column(SPEED_MPH, ColumnData::Float(speed_mean))?
        .with_column(FUEL_CONSUMPTION_MPG, ColumnData::Float(fuel_mean))?
        .with_column(ENGINE_TEMP_F, ColumnData::Float(temp_mean))?
        .with_column(RPM, ColumnData::Float(rpm_mean))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
