use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level the CLI uses when `--log-level` is not given.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber, writing to stderr.
///
/// `log_level` is one of the CLI level names and is mapped by
/// [`filter_directive`]. Stdout stays free for report output.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(log_level, rust_log.as_deref());

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

/// Pick the `EnvFilter` directive.
///
/// A level other than [`DEFAULT_LOG_LEVEL`] was asked for explicitly and
/// wins. Otherwise a non-empty `RUST_LOG` is used, and failing that `info`.
pub fn filter_directive(log_level: &str, rust_log: Option<&str>) -> String {
    let upper = log_level.to_uppercase();
    if upper != DEFAULT_LOG_LEVEL {
        return level_to_directive(&upper).to_string();
    }
    match rust_log.map(str::trim) {
        Some(env) if !env.is_empty() => env.to_string(),
        _ => "info".to_string(),
    }
}

/// Map the CLI level names to tracing levels.
fn level_to_directive(upper: &str) -> &'static str {
    match upper {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
