//! Derived per-row metrics: the efficiency score and the anomaly flags.
//!
//! Both transforms return a copy of the input with their output columns
//! appended. Rows and the other columns are left as they were; an output
//! column that already exists is recomputed in place.

use fleet_core::columns::{
    EFFICIENCY_SCORE, ENGINE_TEMP_F, FUEL_CONSUMPTION_MPG, HIGH_RPM, HIGH_TEMP, LOW_EFFICIENCY,
    RPM, SPEED_MPH,
};
use fleet_core::error::SchemaError;
use fleet_core::table::{ColumnData, Table};
use fleet_core::thresholds::{AnomalyThresholds, MetricsConfig};
use tracing::debug;

// ── Efficiency ────────────────────────────────────────────────────────────────

/// Add `efficiency_score = fuel_consumption_mpg / (speed_mph + 1) * 100`.
///
/// The `+ 1` keeps idle rows finite, so a stationary vehicle scores
/// `mpg * 100`. Treat the score as a relative ranking, not a physical unit.
///
/// An `efficiency_score` column already on the input is overwritten in
/// place; every other column is copied unchanged.
pub fn efficiency_score(table: &Table) -> Result<Table, SchemaError> {
    efficiency_score_with(table, &MetricsConfig::default())
}

/// [`efficiency_score`] with a configurable speed offset and scale.
pub fn efficiency_score_with(table: &Table, config: &MetricsConfig) -> Result<Table, SchemaError> {
    let speed = table.float(SPEED_MPH)?;
    let fuel = table.float(FUEL_CONSUMPTION_MPG)?;

    let scores: Vec<f64> = speed
        .iter()
        .zip(fuel)
        .map(|(s, mpg)| mpg / (s + config.efficiency_speed_offset) * config.efficiency_scale)
        .collect();

    table
        .clone()
        .with_column(EFFICIENCY_SCORE, ColumnData::Float(scores))
}

// ── Anomalies ─────────────────────────────────────────────────────────────────

/// Add the boolean columns `high_temp`, `low_efficiency` and `high_rpm`
/// using the default thresholds (205 °F, 24 MPG, 3200 RPM).
///
/// Flag columns of the same names already on the input are overwritten in
/// place, keeping their position; every other column is copied unchanged.
pub fn identify_anomalies(table: &Table) -> Result<Table, SchemaError> {
    identify_anomalies_with(table, &AnomalyThresholds::default())
}

/// [`identify_anomalies`] with caller-supplied thresholds.
///
/// Comparisons are strict, and a missing (`NaN`) reading never raises a flag.
pub fn identify_anomalies_with(
    table: &Table,
    thresholds: &AnomalyThresholds,
) -> Result<Table, SchemaError> {
    let temp = table.float(ENGINE_TEMP_F)?;
    let fuel = table.float(FUEL_CONSUMPTION_MPG)?;
    let rpm = table.float(RPM)?;

    let high_temp: Vec<bool> = temp.iter().map(|t| *t > thresholds.high_temp_f).collect();
    let low_efficiency: Vec<bool> = fuel
        .iter()
        .map(|mpg| *mpg < thresholds.low_efficiency_mpg)
        .collect();
    let high_rpm: Vec<bool> = rpm.iter().map(|r| *r > thresholds.high_rpm).collect();

    debug!(
        high_temp = high_temp.iter().filter(|f| **f).count(),
        low_efficiency = low_efficiency.iter().filter(|f| **f).count(),
        high_rpm = high_rpm.iter().filter(|f| **f).count(),
        "anomalies flagged"
    );

    table
        .clone()
        .with_column(HIGH_TEMP, ColumnData::Bool(high_temp))?
        .with_column(LOW_EFFICIENCY, ColumnData::Bool(low_efficiency))?
        .with_column(HIGH_RPM, ColumnData::Bool(high_rpm))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
