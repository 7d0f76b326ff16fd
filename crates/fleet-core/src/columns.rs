//! Well-known column names of the telemetry schema and of the tables the
//! transforms derive from it.

pub const VEHICLE_ID: &str = "vehicle_id";
pub const LOCATION: &str = "location";
pub const TIMESTAMP: &str = "timestamp";
pub const SPEED_MPH: &str = "speed_mph";
pub const RPM: &str = "rpm";
pub const FUEL_CONSUMPTION_MPG: &str = "fuel_consumption_mpg";
pub const ENGINE_TEMP_F: &str = "engine_temp_f";
pub const DISTANCE_MILES: &str = "distance_miles";

/// Canonical input schema, in file order.
pub const RECORD_COLUMNS: [&str; 8] = [
    VEHICLE_ID,
    LOCATION,
    TIMESTAMP,
    SPEED_MPH,
    RPM,
    FUEL_CONSUMPTION_MPG,
    ENGINE_TEMP_F,
    DISTANCE_MILES,
];

/// Columns the loader always keeps as text, even when every value is numeric.
pub const TEXT_COLUMNS: [&str; 2] = [VEHICLE_ID, LOCATION];

// ── Derived columns ───────────────────────────────────────────────────────────

pub const EFFICIENCY_SCORE: &str = "efficiency_score";
pub const HIGH_TEMP: &str = "high_temp";
pub const LOW_EFFICIENCY: &str = "low_efficiency";
pub const HIGH_RPM: &str = "high_rpm";

pub const SPEED_MPH_MEAN: &str = "speed_mph_mean";
pub const SPEED_MPH_MAX: &str = "speed_mph_max";
pub const SPEED_MPH_MIN: &str = "speed_mph_min";
pub const FUEL_CONSUMPTION_MPG_MEAN: &str = "fuel_consumption_mpg_mean";
pub const ENGINE_TEMP_F_MEAN: &str = "engine_temp_f_mean";
pub const RPM_MEAN: &str = "rpm_mean";
pub const DISTANCE_MILES_MAX: &str = "distance_miles_max";
pub const LOCATION_FIRST: &str = "location_first";
