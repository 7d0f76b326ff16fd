use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

// ── Report ────────────────────────────────────────────────────────────────────

/// Which view of the filtered data to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Report {
    /// Summary statistics and anomaly counts, as JSON.
    Summary,
    /// One row per vehicle.
    Vehicles,
    /// Per-vehicle hourly means.
    Hourly,
    /// Per-vehicle daily means.
    Daily,
    /// Filtered rows plus the efficiency score.
    Efficiency,
    /// Filtered rows plus the anomaly flags.
    Anomalies,
    /// Filtered rows as loaded.
    Raw,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Report::Summary => "summary",
            Report::Vehicles => "vehicles",
            Report::Hourly => "hourly",
            Report::Daily => "daily",
            Report::Efficiency => "efficiency",
            Report::Anomalies => "anomalies",
            Report::Raw => "raw",
        };
        f.write_str(name)
    }
}

// ── Settings (CLI) ────────────────────────────────────────────────────────────

/// Filter, aggregate and export vehicle telemetry
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fleet-dash",
    about = "Filter, aggregate and export vehicle telemetry",
    version
)]
pub struct Settings {
    /// Telemetry CSV file
    #[arg(long)]
    pub data: PathBuf,

    /// Keep only these vehicles (repeatable; none = all)
    #[arg(long = "vehicle")]
    pub vehicles: Vec<String>,

    /// Keep only these locations (repeatable; none = all)
    #[arg(long = "location")]
    pub locations: Vec<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day to include, whole day (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Report to produce
    #[arg(long, value_enum, default_value_t = Report::Summary)]
    pub report: Report,

    /// Write table reports to this CSV file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// JSON file overriding anomaly thresholds and efficiency parameters
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,
}

impl Settings {
    /// Parse an explicit argument list (the first element is the binary name).
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }
}
