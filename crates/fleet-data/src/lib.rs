//! Data layer for the fleet dashboard.
//!
//! Loads telemetry CSV files into a [`core::Table`], filters rows, computes
//! summary figures and derived metrics, aggregates per vehicle and per time
//! bucket, and writes tables back out as CSV.

pub mod aggregator;
pub mod cache;
pub mod export;
pub mod filters;
pub mod loader;
pub mod metrics;
pub mod summary;

mod stats;

pub use fleet_core as core;
