//! ## parkering-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! `RUST_LOG` takes precedence; the configured level is the fallback.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::TelemetryError;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Fails if one is already set.
    pub fn init(default_level: &str) -> Result<(), TelemetryError> {
        fmt()
            .with_env_filter(Self::filter(default_level)?)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|_| TelemetryError::AlreadyInitialized)
    }

    pub(crate) fn filter(default_level: &str) -> Result<EnvFilter, TelemetryError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(default_level)?),
        }
    }

    /// Records a rejected request at `warn`.
    #[inline]
    pub fn log_rejection(operation: &str, reason: &dyn std::fmt::Display) {
        tracing::warn!(operation, %reason, "request rejected");
    }
}
