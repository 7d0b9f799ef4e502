//! HTTP listener configuration.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ServerConfig {
    /// Address the HTTP API listens on.
    #[validate(custom(function = validation::validate_bind_addr))]
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".into()
}

impl ServerConfig {
    /// Parsed listener address. Only fails on configs that skipped validation.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}
