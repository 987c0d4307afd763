//! Edge service binary.
//!
//! ```bash
//! edge_service serve --addr 0.0.0.0:8080
//! edge_service run --paths 5000 --years 20 --seed 7
//! ```
//!
//! `RUST_LOG` sets the log level (default: info).

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use edge_service::request::SimulationRequest;
use edge_service::service::EdgeService;
use edge_service::store::InMemoryRunStore;
use pathsim::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "edge_service", about = "Monte Carlo path simulation service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, env = "EDGE_ADDR", default_value = "127.0.0.1:8080")]
        addr: String,
        #[arg(long, env = "EDGE_ALLOWED_ORIGIN", default_value = "http://localhost:5173")]
        allowed_origin: String,
        /// Simulation workers, 0 for all cores.
        #[arg(long, default_value_t = 0)]
        workers: usize,
    },
    /// Run a single simulation and print its risk figures as JSON.
    Run {
        #[arg(long)]
        start_price: Option<f64>,
        #[arg(long)]
        years: Option<usize>,
        #[arg(long, allow_hyphen_values = true)]
        drift: Option<f64>,
        #[arg(long)]
        volatility: Option<f64>,
        #[arg(long)]
        paths: Option<usize>,
        #[arg(long)]
        jump_intensity: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        jump_mean: Option<f64>,
        #[arg(long)]
        jump_std_dev: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0)]
        workers: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve {
            addr,
            allowed_origin,
            workers,
        } => {
            let service = EdgeService::new(Arc::new(InMemoryRunStore::new()))
                .with_allowed_origin(&allowed_origin)
                .with_workers(workers);
            edge_service::serve(&addr, service).with_context(|| format!("serving on {}", addr))?;
        }
        Command::Run {
            start_price,
            years,
            drift,
            volatility,
            paths,
            jump_intensity,
            jump_mean,
            jump_std_dev,
            seed,
            workers,
        } => {
            let request = SimulationRequest {
                start_price,
                years,
                drift,
                volatility,
                num_paths: paths,
                jump_intensity,
                jump_mean,
                jump_std_dev,
                ..SimulationRequest::default()
            };
            let config = request.to_config();
            let simulator = PathSimulator::new().with_workers(workers);
            let result = match seed {
                Some(seed) => simulator.with_seed(seed).simulate(&config),
                None => simulator.simulate(&config),
            }
            .context("simulation failed")?;

            let terminal = result.terminal_values();
            let output = serde_json::json!({
                "config": config,
                "paths_count": result.len(),
                "risk": RiskAnalyzer::analyze(&terminal),
                "statistics": SummaryStatistics::from_values(&terminal),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
