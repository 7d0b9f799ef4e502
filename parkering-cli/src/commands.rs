use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use parkering_api::{metrics_router, router, ParkingService};
use parkering_config::{ConfigError, ParkeringConfig};
use parkering_core::ParkingLot;
use parkering_telemetry::{EventLogger, MetricsRecorder};

use crate::fuzz;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Drive a seeded random workload against a lot, checking consistency after every step
    Fuzz(FuzzArgs),
    /// Print the effective configuration as YAML
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Configuration file; defaults to config/parkering.yaml plus environment overrides
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Overrides `server.bind_addr`
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args, Debug, Clone)]
pub struct FuzzArgs {
    /// Configuration file; only `telemetry.log_level` is used
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Initial seed (incremented for each iteration)
    #[arg(long, default_value_t = 1)]
    pub seed: u64,
    /// Number of seeds to run
    #[arg(long, default_value_t = 1)]
    pub iterations: u64,
    /// Operations per seed
    #[arg(long, default_value_t = 10_000)]
    pub operations: usize,
    /// Initial lot size
    #[arg(long, default_value_t = 16)]
    pub capacity: u32,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Fuzz(args) => run_fuzz(args),
        Commands::Config(args) => print_config(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<ParkeringConfig, ConfigError> {
    match path {
        Some(path) => ParkeringConfig::load_from_path(path),
        None => ParkeringConfig::load(),
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind.to_string();
    }
    EventLogger::init(&config.telemetry.log_level)?;

    let addr = config.server.socket_addr()?;
    let metrics = MetricsRecorder::new()?;
    let lot = ParkingLot::with_max_capacity(config.lot.max_capacity);
    let service = ParkingService::new(lot, metrics.clone());

    let mut app = router(service);
    if config.telemetry.metrics_enabled {
        app = app.merge(metrics_router(metrics));
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, max_capacity = config.lot.max_capacity, "parkering listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for ctrl-c");
    }
}

fn run_fuzz(args: FuzzArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    EventLogger::init(&config.telemetry.log_level)?;

    for seed in args.seed..args.seed.saturating_add(args.iterations) {
        let report = fuzz::run(seed, args.operations, args.capacity)?;
        info!(
            seed,
            parked = report.parked,
            released = report.released,
            expansions = report.expansions,
            rejected = report.rejected,
            total = report.final_total,
            occupied = report.final_occupied,
            "fuzz run passed"
        );
    }
    Ok(())
}

fn print_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}
