//! # Parkering Configuration System
//!
//! Layered configuration for the parking lot service.
//!
//! ## Features
//! - **Layering**: defaults, YAML files, then `PARKERING_*` environment variables
//! - **Validation**: every section is checked with `validator` after extraction

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod lot;
mod server;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use lot::LotConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/parkering.yaml";
const ENV_PREFIX: &str = "PARKERING_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct ParkeringConfig {
    /// HTTP listener.
    #[validate(nested)]
    #[serde(default)]
    pub server: ServerConfig,

    /// Lot size limits.
    #[validate(nested)]
    #[serde(default)]
    pub lot: LotConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ParkeringConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/parkering.yaml`, skipped when missing
    /// 3. `config/<PARKERING_ENV>.yaml`, environment‑specific overrides (default `production`)
    /// 4. `PARKERING_*` environment variables, `__` separating nested keys
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ParkeringConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("PARKERING_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific file, still honouring environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let figment = Figment::from(Serialized::defaults(ParkeringConfig::default()))
            .merge(Yaml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
