//! API request handlers
//!
//! Each POST handler validates the recording, runs the numeric core on the
//! blocking pool and maps the result onto the wire schema clients already
//! consume.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ndarray::Array2;
use serde::Serialize;
use tracing::{error, info, warn};

use super::envelope::ApiErrorResponse;
use crate::acquisition::SensorInput;
use crate::config::{AnalysisConfig, ServiceConfig};
use crate::processing::{self, AnalysisError};
use crate::types::{
    AmplitudeMetrics, AnalysisResult, AxisCorrelations, ClinicalScores, SpectrumResult,
};

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<ServiceConfig>,
}

impl ApiState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Wire Schema
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `POST /fft` body
#[derive(Debug, Serialize)]
pub struct FftResponse {
    pub frequency: Vec<f64>,
    pub spectrum: Vec<f64>,
}

impl From<SpectrumResult> for FftResponse {
    fn from(s: SpectrumResult) -> Self {
        Self {
            frequency: s.frequencies,
            spectrum: s.magnitudes,
        }
    }
}

/// `POST /analyze_signal` body, borrowed from the pipeline result.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse<'a> {
    pub sampling_rate_hz: f64,
    pub original_metrics: OriginalMetrics,
    pub correlations: &'a AxisCorrelations,
    pub fft: FftSection<'a>,
    pub wavelet: WaveletSection<'a>,
    pub entropy: EntropySection,
    pub movement_analysis: MovementSection,
    pub clinical_metrics: &'a ClinicalScores,
}

#[derive(Debug, Serialize)]
pub struct OriginalMetrics {
    pub mean_amplitude: f64,
    pub std_amplitude: f64,
    pub peak_amplitude: f64,
    #[serde(rename = "min amplitude")]
    pub min_amplitude: f64,
    #[serde(rename = "range amplitude")]
    pub range_amplitude: f64,
}

impl From<&AmplitudeMetrics> for OriginalMetrics {
    fn from(m: &AmplitudeMetrics) -> Self {
        Self {
            mean_amplitude: m.mean_amplitude,
            std_amplitude: m.std_amplitude,
            peak_amplitude: m.peak_amplitude,
            min_amplitude: m.min_amplitude,
            range_amplitude: m.range_amplitude,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FftSection<'a> {
    pub frequency: &'a [f64],
    pub spectrum: &'a [f64],
    #[serde(rename = "dominat_frequency")]
    pub dominant_frequency: f64,
    pub tremor_amplitude: f64,
}

#[derive(Debug, Serialize)]
pub struct WaveletSection<'a> {
    #[serde(serialize_with = "crate::types::serialize_rows")]
    pub coefficients: &'a Array2<f64>,
    pub frequencies: &'a [f64],
    pub scales: &'a [u32],
}

#[derive(Debug, Serialize)]
pub struct EntropySection {
    /// `0.0` when undefined; check `status`
    pub entropy: f64,
    pub status: &'static str,
    pub amplitude_metrics: AmplitudeMetrics,
}

#[derive(Debug, Serialize)]
pub struct MovementSection {
    pub movement_intensity: f64,
    pub movement_variability: f64,
    pub peak_movement: f64,
    #[serde(rename = "axis_symetry")]
    pub axis_symmetry: f64,
}

impl<'a> From<&'a AnalysisResult> for AnalyzeResponse<'a> {
    fn from(r: &'a AnalysisResult) -> Self {
        Self {
            sampling_rate_hz: r.sampling_rate_hz,
            original_metrics: OriginalMetrics::from(&r.original_metrics),
            correlations: &r.correlations,
            fft: FftSection {
                frequency: &r.spectrum.frequencies,
                spectrum: &r.spectrum.magnitudes,
                dominant_frequency: r.spectrum.dominant_frequency,
                tremor_amplitude: r.spectrum.peak_magnitude,
            },
            wavelet: WaveletSection {
                coefficients: &r.wavelet.coefficients,
                frequencies: &r.wavelet.pseudo_frequencies,
                scales: &r.wavelet.scales,
            },
            entropy: EntropySection {
                entropy: r.entropy.entropy.value_or_sentinel(),
                status: r.entropy.entropy.status(),
                amplitude_metrics: r.entropy.amplitude_metrics,
            },
            movement_analysis: MovementSection {
                movement_intensity: r.movement.movement_intensity,
                movement_variability: r.movement.movement_variability,
                peak_movement: r.movement.peak_movement,
                axis_symmetry: r.movement.axis_symmetry,
            },
            clinical_metrics: &r.clinical,
        }
    }
}

// ============================================================================
// Service Endpoints
// ============================================================================

/// GET / - Service banner
pub async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "tremorscope",
    })
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Analysis Endpoints
// ============================================================================

/// POST /fft - Half-spectrum of the accelerometer x axis
pub async fn fft(
    State(state): State<ApiState>,
    payload: Result<Json<SensorInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return reject_body(rejection),
    };

    let samples = input.accelerometer.len();
    if let Err(e) = check_window_len(samples, &state.config.analysis) {
        return reject_analysis("/fft", samples, &e);
    }
    let config = Arc::clone(&state.config);
    let outcome =
        tokio::task::spawn_blocking(move || run_spectrum(&input, &config.analysis)).await;

    match outcome {
        Ok(Ok(spectrum)) => {
            info!(
                samples = samples,
                dominant_frequency = spectrum.dominant_frequency,
                "FFT request served"
            );
            (StatusCode::OK, Json(FftResponse::from(spectrum))).into_response()
        }
        Ok(Err(e)) => reject_analysis("/fft", samples, &e),
        Err(e) => {
            error!(error = %e, "FFT task failed");
            ApiErrorResponse::internal("spectral analysis task failed")
        }
    }
}

/// POST /analyze_signal - Full movement analysis of one recording
pub async fn analyze_signal(
    State(state): State<ApiState>,
    payload: Result<Json<SensorInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return reject_body(rejection),
    };

    let samples = input.accelerometer.len();
    if let Err(e) = check_window_len(samples, &state.config.analysis) {
        return reject_analysis("/analyze_signal", samples, &e);
    }
    let started = Instant::now();
    let config = Arc::clone(&state.config);
    let outcome =
        tokio::task::spawn_blocking(move || run_analysis(&input, &config.analysis)).await;

    match outcome {
        Ok(Ok(result)) => {
            info!(
                samples = samples,
                fs = result.sampling_rate_hz,
                dominant_frequency = result.spectrum.dominant_frequency,
                entropy = %result.entropy.entropy.status(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Analysis request served"
            );
            (StatusCode::OK, Json(AnalyzeResponse::from(&result))).into_response()
        }
        Ok(Err(e)) => reject_analysis("/analyze_signal", samples, &e),
        Err(e) => {
            error!(error = %e, "Analysis task failed");
            ApiErrorResponse::internal("analysis task failed")
        }
    }
}

/// Reject oversized windows before any work reaches the blocking pool.
fn check_window_len(samples: usize, cfg: &AnalysisConfig) -> Result<(), AnalysisError> {
    if samples > cfg.max_samples {
        return Err(AnalysisError::WindowTooLong {
            limit: cfg.max_samples,
            available: samples,
        });
    }
    Ok(())
}

fn run_spectrum(input: &SensorInput, cfg: &AnalysisConfig) -> Result<SpectrumResult, AnalysisError> {
    let fs = input.resolve_sampling_rate(cfg.sampling_rate_hz, cfg.derive_sampling_rate)?;
    let x = input.accelerometer_x()?;
    if x.len() < cfg.min_samples {
        return Err(AnalysisError::InsufficientLength {
            needed: cfg.min_samples,
            available: x.len(),
        });
    }
    processing::spectral_analyze(x.as_slice(), fs)
}

fn run_analysis(input: &SensorInput, cfg: &AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    let fs = input.resolve_sampling_rate(cfg.sampling_rate_hz, cfg.derive_sampling_rate)?;
    let triple = input.accelerometer_triple()?;
    triple.ensure_min_len(cfg.min_samples)?;
    processing::analyze_with(&triple, &cfg.params(fs))
}

fn reject_body(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "Rejected request body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiErrorResponse::payload_too_large(rejection.body_text());
    }
    ApiErrorResponse::bad_request(rejection.body_text())
}

fn reject_analysis(route: &str, samples: usize, e: &AnalysisError) -> Response {
    warn!(route = route, samples = samples, error = %e, "Analysis rejected");
    ApiErrorResponse::from_analysis(e)
}
