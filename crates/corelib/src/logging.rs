//! Logging setup

use crate::error::ReportError;
use tracing::Level;
use tracing_subscriber::{
    fmt::{format::FmtSpan, time::UtcTime},
    FmtSubscriber,
};

/// Installs the global subscriber; file and line are shown from `debug` on
pub fn setup_logging(level: Level) -> crate::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_timer(UtcTime::rfc_3339())
        .with_span_events(FmtSpan::CLOSE)
        .with_max_level(level)
        .with_target(false)
        .with_file(level >= Level::DEBUG)
        .with_line_number(level >= Level::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ReportError::Config(format!("Logging already initialized: {}", e)))
}
