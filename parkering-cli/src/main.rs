//! ## parkering-cli
//! **Operational entry point for the parking lot service**
//!
//! - `serve`: run the HTTP API
//! - `fuzz`: seeded random workload against an in-memory lot
//! - `config`: print the effective configuration

use clap::Parser;

mod commands;
mod fuzz;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
