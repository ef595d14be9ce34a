//! Council Whitelist Service
//!
//! REST API answering council membership queries for the DAO front-end.

mod api;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use council_whitelist::{MembershipProver, WhitelistConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "whitelist-service")]
#[command(about = "Membership API for the DAO council whitelist")]
struct Args {
    /// Whitelist configuration (JSON roster, optionally with a pinned root)
    #[arg(long, env = "WHITELIST_CONFIG", default_value = "config/council.example.json")]
    config: PathBuf,

    /// API listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Metrics listen address
    #[arg(long, env = "METRICS_LISTEN", default_value = "0.0.0.0:9090")]
    metrics_listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    tracing::info!("Starting council whitelist service");
    tracing::info!(config = %args.config.display(), "Whitelist configuration");

    // An invalid roster stops startup rather than serving `false` to everyone
    let config = WhitelistConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let prover = MembershipProver::from_config(config).context("invalid whitelist")?;

    PrometheusBuilder::new()
        .with_http_listener(args.metrics_listen)
        .install()
        .context("installing metrics exporter")?;
    tracing::info!(listen = %args.metrics_listen, "Metrics exporter");

    // Initialize application state
    let app_state = state::AppState::new(prover);

    // Start API server
    let api_handle = tokio::spawn(api::run_server(args.listen.clone(), app_state));

    // Wait for shutdown
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
        }
        result = api_handle => {
            match result {
                Ok(Err(e)) => tracing::error!(error = %e, "API server error"),
                Err(e) => tracing::error!(error = %e, "API server task failed"),
                Ok(Ok(())) => {}
            }
        }
    }

    Ok(())
}
