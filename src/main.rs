//! tremorscope - movement analysis service
//!
//! HTTP service that analyzes short accelerometer recordings from wearables
//! and phones.
//!
//! # Usage
//!
//! ```bash
//! # Run with built-in defaults (0.0.0.0:8000, 22 Hz)
//! cargo run --release
//!
//! # Explicit config file and bind address
//! ./tremorscope --config /etc/tremorscope.toml --addr 127.0.0.1:9000
//!
//! # Feed a synthetic recording
//! ./tremor-sim --frequency 5 --post http://localhost:8000/analyze_signal
//! ```
//!
//! # Environment Variables
//!
//! - `TREMORSCOPE_CONFIG`: Path to TOML config
//! - `TREMORSCOPE_SERVER_ADDR`: Bind address override
//! - `TREMORSCOPE_CORS_ORIGINS`: Comma-separated allowed origins
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tremorscope::api::{create_app, ApiState};
use tremorscope::config::ServiceConfig;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "tremorscope")]
#[command(about = "Movement signal analysis service for wearable accelerometer data")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8000")
    #[arg(short, long, value_name = "HOST:PORT")]
    addr: Option<String>,

    /// Path to a TOML config file (takes precedence over TREMORSCOPE_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default sampling rate in Hz for requests that do not carry one
    #[arg(long)]
    sampling_rate: Option<f64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Resolve config: explicit `--config` file, else the standard search,
/// then env and CLI overrides, then re-validate.
fn load_config(args: &CliArgs) -> Result<ServiceConfig> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServiceConfig::load(),
    };

    config.apply_env_overrides();
    if let Some(addr) = &args.addr {
        config.server.addr = addr.clone();
    }
    if let Some(fs) = args.sampling_rate {
        config.analysis.sampling_rate_hz = fs;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = load_config(&args)?;
    let addr = config.server.addr.clone();

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  tremorscope {}", env!("CARGO_PKG_VERSION"));
    info!("  Movement Signal Analysis Service");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        fs = config.analysis.sampling_rate_hz,
        derive = config.analysis.derive_sampling_rate,
        min_samples = config.analysis.min_samples,
        max_samples = config.analysis.max_samples,
        scales = %format!("{}..={}", config.analysis.wavelet_min_scale, config.analysis.wavelet_max_scale),
        "Analysis defaults"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on http://{}", addr);

    let app = create_app(ApiState::new(config));

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await;

    match result {
        Ok(()) => {
            info!("Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}
