//! Synthetic Tremor Recording Generator
//!
//! Produces a `SensorInput` JSON document for exercising tremorscope:
//! - tremor sinusoid on the x axis
//! - optional coupling of the tremor onto y
//! - Gaussian sensor noise on every axis
//!
//! # Usage
//! ```bash
//! ./tremor-sim --frequency 5 --duration 4 > recording.json
//! ./tremor-sim --seed 7 --post http://localhost:8000/analyze_signal
//! ```

use std::f64::consts::PI;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use tremorscope::acquisition::{SensorInput, SensorReading};

/// Resting gravity component on z (m/s²)
const GRAVITY: f64 = 9.81;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "tremor-sim")]
#[command(about = "Synthetic accelerometer recordings for tremorscope testing")]
#[command(version)]
struct Args {
    /// Tremor frequency in Hz
    #[arg(short, long, default_value = "5.0")]
    frequency: f64,

    /// Tremor amplitude (m/s²)
    #[arg(short, long, default_value = "1.0")]
    amplitude: f64,

    /// Fraction of the tremor that also appears on y (0 = independent axes)
    #[arg(long, default_value = "0.0")]
    coupling: f64,

    /// Noise standard deviation on each axis
    #[arg(short, long, default_value = "0.05")]
    noise: f64,

    /// Sampling rate in Hz
    #[arg(short, long, default_value = "22.0")]
    rate: f64,

    /// Recording duration in seconds
    #[arg(short, long, default_value = "2.0")]
    duration: f64,

    /// Include `sampling_rate_hz` in the generated document
    #[arg(long)]
    embed_rate: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// POST the recording to this URL instead of printing it
    #[arg(long, value_name = "URL")]
    post: Option<String>,
}

// ============================================================================
// Generation
// ============================================================================

fn generate(args: &Args) -> Result<SensorInput> {
    if !(args.rate.is_finite() && args.rate > 0.0) {
        anyhow::bail!("--rate must be a positive number, got {}", args.rate);
    }
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("--duration must be a positive number, got {}", args.duration);
    }

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let noise = Normal::new(0.0, args.noise.max(0.0)).context("Invalid --noise")?;

    let samples = (args.rate * args.duration).round() as usize;
    let accelerometer = (0..samples)
        .map(|i| {
            let t = i as f64 / args.rate;
            let tremor = args.amplitude * (2.0 * PI * args.frequency * t).sin();
            SensorReading {
                x: tremor + noise.sample(&mut rng),
                y: args.coupling * tremor + noise.sample(&mut rng),
                z: GRAVITY + noise.sample(&mut rng),
                timestamp: t,
            }
        })
        .collect();

    Ok(SensorInput {
        accelerometer,
        gyroscope: Vec::new(),
        sampling_rate_hz: args.embed_rate.then_some(args.rate),
    })
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let recording = generate(&args)?;

    eprintln!(
        "Generated {} samples at {} Hz ({} Hz tremor, coupling {})",
        recording.accelerometer.len(),
        args.rate,
        args.frequency,
        args.coupling
    );

    match &args.post {
        Some(url) => {
            let client = reqwest::Client::new();
            let response = client
                .post(url)
                .json(&recording)
                .send()
                .await
                .with_context(|| format!("Failed to POST recording to {}", url))?;
            let status = response.status();
            let body = response.text().await.context("Failed to read response body")?;
            eprintln!("{} {}", status, url);
            println!("{}", body);
            if !status.is_success() {
                anyhow::bail!("Server rejected recording with {}", status);
            }
        }
        None => {
            let json = serde_json::to_string_pretty(&recording)?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
