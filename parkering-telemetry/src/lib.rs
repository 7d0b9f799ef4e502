//! # Parkering Telemetry
//!
//! Crate for logging and metrics.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Global subscriber already installed")]
    AlreadyInitialized,

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Metrics output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}
