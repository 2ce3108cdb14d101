//! Window analyzer - runs the full pipeline over one accelerometer window
//!
//! Conditioning → statistics, correlation, spectrum, wavelet, entropy →
//! clinical synthesis. Stateless and synchronous; the host decides where it
//! runs.

use std::time::Instant;

use super::correlation::unbiased_correlation;
use super::entropy::{sample_entropy, DEFAULT_EMBEDDING_DIM, DEFAULT_TOLERANCE_RATIO};
use super::fft::{spectral_analysis, MIN_SPECTRAL_SAMPLES};
use super::statistics::amplitude_metrics;
use super::wavelet::{default_scales, wavelet_decompose, WaveletFamily};
use super::{clinical, AnalysisError};
use crate::types::{AnalysisResult, AxisCorrelations, AxisTriple, SpectrumResult};

/// Explicit parameters for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    pub sampling_rate_hz: f64,
    /// Sample entropy embedding dimension (m)
    pub embedding_dim: usize,
    /// Sample entropy tolerance ratio, applied to the original std
    pub tolerance_ratio: f64,
    pub wavelet_scales: Vec<u32>,
    pub wavelet_family: WaveletFamily,
}

impl AnalysisParams {
    /// Default pipeline parameters at the given sampling rate.
    pub fn new(sampling_rate_hz: f64) -> Self {
        Self {
            sampling_rate_hz,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            tolerance_ratio: DEFAULT_TOLERANCE_RATIO,
            wavelet_scales: default_scales(),
            wavelet_family: WaveletFamily::Morlet,
        }
    }

    /// Shortest window every stage can handle: `max(4, m + 2)`.
    pub fn min_samples(&self) -> usize {
        MIN_SPECTRAL_SAMPLES.max(self.embedding_dim + 2)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.sampling_rate_hz.is_finite() || self.sampling_rate_hz <= 0.0 {
            return Err(AnalysisError::InvalidSamplingRate(self.sampling_rate_hz));
        }
        if self.embedding_dim == 0 {
            return Err(AnalysisError::InvalidParameter(
                "embedding dimension must be >= 1".to_string(),
            ));
        }
        if !self.tolerance_ratio.is_finite() || self.tolerance_ratio <= 0.0 {
            return Err(AnalysisError::InvalidParameter(format!(
                "tolerance ratio must be > 0, got {}",
                self.tolerance_ratio
            )));
        }
        Ok(())
    }
}

/// Analyze a window with default parameters at `sampling_rate_hz`.
pub fn analyze(
    triple: &AxisTriple,
    sampling_rate_hz: f64,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_with(triple, &AnalysisParams::new(sampling_rate_hz))
}

/// Analyze a window with explicit parameters.
pub fn analyze_with(
    triple: &AxisTriple,
    params: &AnalysisParams,
) -> Result<AnalysisResult, AnalysisError> {
    params.validate()?;
    triple.ensure_min_len(params.min_samples())?;

    let started = Instant::now();
    let fs = params.sampling_rate_hz;
    let (x, y, z) = (triple.x.as_slice(), triple.y.as_slice(), triple.z.as_slice());

    let original_metrics = amplitude_metrics(x)?;

    let correlations = AxisCorrelations {
        x_y: unbiased_correlation(x, y)?,
        x_z: unbiased_correlation(x, z)?,
        y_z: unbiased_correlation(y, z)?,
    };

    let spectrum = spectral_analysis(x, fs)?;
    let wavelet = wavelet_decompose(x, &params.wavelet_scales, params.wavelet_family, fs)?;
    let entropy = sample_entropy(x, params.embedding_dim, params.tolerance_ratio)?;

    let movement = clinical::movement_analysis(&original_metrics, &correlations.x_y);
    let clinical =
        clinical::clinical_scores(&original_metrics, &spectrum, &entropy, &correlations.x_y)?;

    tracing::debug!(
        samples = triple.len(),
        fs = fs,
        dominant_frequency = spectrum.dominant_frequency,
        tremor_score = clinical.tremor_score,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Window analysis complete"
    );

    Ok(AnalysisResult {
        sampling_rate_hz: fs,
        original_metrics,
        correlations,
        spectrum,
        wavelet,
        entropy,
        movement,
        clinical,
    })
}

/// Spectrum-only analysis of one series.
pub fn spectral_analyze(series: &[f64], sampling_rate_hz: f64) -> Result<SpectrumResult, AnalysisError> {
    spectral_analysis(series, sampling_rate_hz)
}
