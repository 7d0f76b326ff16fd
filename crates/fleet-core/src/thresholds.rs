//! Domain constants for the derived metrics, and the overridable
//! configuration built from them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FleetError;

/// Engine temperature (°F) above which a sample is flagged `high_temp`.
pub const HIGH_TEMP_THRESHOLD_F: f64 = 205.0;

/// Fuel economy (MPG) below which a sample is flagged `low_efficiency`.
pub const LOW_EFFICIENCY_THRESHOLD_MPG: f64 = 24.0;

/// Engine speed above which a sample is flagged `high_rpm`.
pub const HIGH_RPM_THRESHOLD: f64 = 3200.0;

/// Added to `speed_mph` in the efficiency-score denominator so that idle
/// samples (speed 0) still get a finite score. The score is therefore an
/// approximation, not a pure MPG-per-MPH ratio.
pub const EFFICIENCY_SPEED_OFFSET: f64 = 1.0;

/// Multiplier applied to the efficiency ratio.
pub const EFFICIENCY_SCALE: f64 = 100.0;

// ── AnomalyThresholds ─────────────────────────────────────────────────────────

/// Cut-offs for the three anomaly flags. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    /// `engine_temp_f > high_temp_f` → `high_temp`.
    pub high_temp_f: f64,
    /// `fuel_consumption_mpg < low_efficiency_mpg` → `low_efficiency`.
    pub low_efficiency_mpg: f64,
    /// `rpm > high_rpm` → `high_rpm`.
    pub high_rpm: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            high_temp_f: HIGH_TEMP_THRESHOLD_F,
            low_efficiency_mpg: LOW_EFFICIENCY_THRESHOLD_MPG,
            high_rpm: HIGH_RPM_THRESHOLD,
        }
    }
}

// ── MetricsConfig ─────────────────────────────────────────────────────────────

/// Parameters of the derived-metric transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub anomalies: AnomalyThresholds,
    pub efficiency_speed_offset: f64,
    pub efficiency_scale: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            anomalies: AnomalyThresholds::default(),
            efficiency_speed_offset: EFFICIENCY_SPEED_OFFSET,
            efficiency_scale: EFFICIENCY_SCALE,
        }
    }
}

impl MetricsConfig {
    /// Read a JSON override file. Absent fields keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, FleetError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            FleetError::Config(format!("invalid metrics config {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), ?config, "metrics config loaded");
        Ok(config)
    }
}
