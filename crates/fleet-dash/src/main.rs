mod bootstrap;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use fleet_core::formatting::format_number;
use fleet_core::settings::{Report, Settings};
use fleet_core::thresholds::MetricsConfig;
use fleet_core::{Table, TimeBucket};
use fleet_data::aggregator::{aggregate_by_time, aggregate_by_vehicle};
use fleet_data::export::{save_csv, write_csv};
use fleet_data::filters::{apply_filters, FilterSelection};
use fleet_data::loader::load;
use fleet_data::metrics::{efficiency_score_with, identify_anomalies_with};
use fleet_data::summary::{count_anomalies, summarize};

fn main() -> Result<()> {
    let settings = Settings::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit());

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Fleet Dash v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data: {}, Report: {}", settings.data.display(), settings.report);

    let output = run(&settings)?;
    emit(output, settings.output.as_deref())
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// What a report produces: a JSON document or a table for CSV export.
#[derive(Debug)]
enum ReportOutput {
    Json(serde_json::Value),
    Table(Table),
}

/// Load, filter and build the selected report.
fn run(settings: &Settings) -> Result<ReportOutput> {
    let config = match &settings.thresholds {
        Some(path) => MetricsConfig::load_from(path)
            .with_context(|| format!("loading thresholds from {}", path.display()))?,
        None => MetricsConfig::default(),
    };

    let table = load(&settings.data)
        .with_context(|| format!("loading {}", settings.data.display()))?;
    tracing::info!("Loaded {} records", format_number(table.len() as f64, 0));

    let selection = FilterSelection {
        vehicles: settings.vehicles.clone(),
        locations: settings.locations.clone(),
        start_date: settings.start,
        end_date: settings.end,
    };
    let filtered = apply_filters(&table, &selection)?;
    if filtered.is_empty() {
        tracing::warn!("no data matches the selected filters");
    }

    build_report(settings.report, &filtered, &config)
}

fn build_report(report: Report, filtered: &Table, config: &MetricsConfig) -> Result<ReportOutput> {
    let output = match report {
        Report::Summary => {
            let summary = summarize(filtered)?;
            let flagged = identify_anomalies_with(filtered, &config.anomalies)?;
            let anomalies = count_anomalies(&flagged)?;
            tracing::info!(
                "{} records from {} vehicles, avg speed {} mph, {} miles",
                format_number(summary.total_records as f64, 0),
                summary.unique_vehicles,
                format_number(summary.avg_speed, 1),
                format_number(summary.total_distance, 1)
            );
            ReportOutput::Json(serde_json::json!({
                "summary": summary,
                "anomalies": anomalies,
            }))
        }
        Report::Vehicles => ReportOutput::Table(aggregate_by_vehicle(filtered)?),
        Report::Hourly => ReportOutput::Table(aggregate_by_time(filtered, TimeBucket::Hour)?),
        Report::Daily => ReportOutput::Table(aggregate_by_time(filtered, TimeBucket::Day)?),
        Report::Efficiency => ReportOutput::Table(efficiency_score_with(filtered, config)?),
        Report::Anomalies => {
            ReportOutput::Table(identify_anomalies_with(filtered, &config.anomalies)?)
        }
        Report::Raw => ReportOutput::Table(filtered.clone()),
    };
    Ok(output)
}

/// Print the report to stdout, or write it to `path` when one is given.
fn emit(output: ReportOutput, path: Option<&Path>) -> Result<()> {
    match (output, path) {
        (ReportOutput::Json(value), None) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        (ReportOutput::Json(value), Some(path)) => {
            std::fs::write(path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        (ReportOutput::Table(table), None) => {
            let mut stdout = std::io::stdout().lock();
            write_csv(&table, &mut stdout)?;
            stdout.flush()?;
        }
        (ReportOutput::Table(table), Some(path)) => {
            save_csv(&table, path).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote {} rows to {}", table.len(), path.display());
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
