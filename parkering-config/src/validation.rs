//! Custom validation functions for configuration.

use std::net::SocketAddr;

use validator::ValidationError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate that the bind address parses as `ip:port`.
pub fn validate_bind_addr(addr: &str) -> Result<(), ValidationError> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_bind_addr"))
}

/// Validate the default log level.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}
