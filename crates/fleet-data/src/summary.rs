//! Scalar summaries of a (usually filtered) telemetry table.

use std::collections::BTreeMap;

use fleet_core::columns::{
    DISTANCE_MILES, ENGINE_TEMP_F, FUEL_CONSUMPTION_MPG, HIGH_RPM, HIGH_TEMP, LOW_EFFICIENCY,
    SPEED_MPH, VEHICLE_ID,
};
use fleet_core::error::SchemaError;
use fleet_core::table::Table;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stats;

// ── SummaryStats ──────────────────────────────────────────────────────────────

/// Headline figures for the dashboard's summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Row count, idle rows included.
    pub total_records: usize,
    /// Distinct `vehicle_id` values.
    pub unique_vehicles: usize,
    /// Mean speed over active rows (`speed_mph > 0`); 0 when none are active.
    pub avg_speed: f64,
    /// Mean MPG over active rows; 0 when none are active.
    pub avg_fuel_consumption: f64,
    /// Mean engine temperature over all rows; 0 for an empty table.
    pub avg_engine_temp: f64,
    /// Sum over vehicles of each vehicle's highest odometer reading.
    pub total_distance: f64,
}

/// Compute [`SummaryStats`] for `table`.
///
/// Speed and fuel averages skip idle rows so parked vehicles do not drag
/// them down. Distance is an odometer, so each vehicle contributes its
/// maximum reading once rather than the sum of its rows.
pub fn summarize(table: &Table) -> Result<SummaryStats, SchemaError> {
    let vehicle_ids = table.text(VEHICLE_ID)?;
    let speed = table.float(SPEED_MPH)?;
    let fuel = table.float(FUEL_CONSUMPTION_MPG)?;
    let temp = table.float(ENGINE_TEMP_F)?;
    let distance = table.float(DISTANCE_MILES)?;

    let mut max_distance: BTreeMap<&str, f64> = BTreeMap::new();
    for (id, miles) in vehicle_ids.iter().zip(distance) {
        let entry = max_distance.entry(id.as_str()).or_insert(f64::NAN);
        *entry = entry.max(*miles);
    }

    let active: Vec<usize> = (0..table.len()).filter(|&i| speed[i] > 0.0).collect();

    let summary = SummaryStats {
        total_records: table.len(),
        unique_vehicles: max_distance.len(),
        avg_speed: stats::mean(active.iter().map(|&i| speed[i])).unwrap_or(0.0),
        avg_fuel_consumption: stats::mean(active.iter().map(|&i| fuel[i])).unwrap_or(0.0),
        avg_engine_temp: stats::mean(temp.iter().copied()).unwrap_or(0.0),
        total_distance: max_distance.values().filter(|v| !v.is_nan()).sum(),
    };

    debug!(
        total_records = summary.total_records,
        unique_vehicles = summary.unique_vehicles,
        active_records = active.len(),
        "summary computed"
    );

    Ok(summary)
}

// ── AnomalyCounts ─────────────────────────────────────────────────────────────

/// Number of flagged rows per anomaly kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyCounts {
    pub high_temp: usize,
    pub low_efficiency: usize,
    pub high_rpm: usize,
}

/// Count the `true` cells of each flag column added by
/// [`identify_anomalies`](crate::metrics::identify_anomalies).
pub fn count_anomalies(flagged: &Table) -> Result<AnomalyCounts, SchemaError> {
    let count = |name: &str| -> Result<usize, SchemaError> {
        Ok(flagged.bool(name)?.iter().filter(|flag| **flag).count())
    };
    Ok(AnomalyCounts {
        high_temp: count(HIGH_TEMP)?,
        low_efficiency: count(LOW_EFFICIENCY)?,
        high_rpm: count(HIGH_RPM)?,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
