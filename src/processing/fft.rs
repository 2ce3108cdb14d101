//! FFT computation using rustfft
//!
//! Spectral analysis of one accelerometer axis for tremor detection.
//!
//! # Conventions
//!
//! - The DFT is taken at exactly N points (no zero padding), so bin `k`
//!   maps to `k * fs / N` Hz and the resolution is `fs / N`.
//! - Magnitudes are unscaled `|X[k]|` over the first `floor(N/2)` bins.
//! - The dominant-frequency search skips bin 0 (DC): after centering it is
//!   near zero, and any residual there is not a physiological tremor.
//!
//! # Example
//!
//! ```ignore
//! use tremorscope::processing::spectral_analysis;
//!
//! let spectrum = spectral_analysis(&acc_x, 22.0)?;
//! println!("tremor at {:.2} Hz", spectrum.dominant_frequency);
//! ```

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use super::conditioning::center;
use super::AnalysisError;
use crate::types::SpectrumResult;

/// Shortest window with at least one non-DC bin in the half-spectrum.
pub const MIN_SPECTRAL_SAMPLES: usize = 4;

/// Center `signal`, transform it and extract the dominant non-DC peak.
pub fn spectral_analysis(signal: &[f64], fs: f64) -> Result<SpectrumResult, AnalysisError> {
    if signal.len() < MIN_SPECTRAL_SAMPLES {
        return Err(AnalysisError::InsufficientLength {
            needed: MIN_SPECTRAL_SAMPLES,
            available: signal.len(),
        });
    }

    let centered = center(signal)?;
    let processor = FftProcessor::new(centered.len(), fs)?;
    let spectrum = processor.compute(&centered)?;

    tracing::debug!(
        samples = signal.len(),
        fs = fs,
        dominant_frequency = spectrum.dominant_frequency,
        peak_magnitude = spectrum.peak_magnitude,
        "Spectral analysis complete"
    );

    Ok(spectrum)
}

// ============================================================================
// FFT Processor (Pre-planned for repeated use)
// ============================================================================

/// FFT processor with a pre-planned transform of one fixed size.
pub struct FftProcessor {
    fft: Arc<dyn Fft<f64>>,
    size: usize,
    sampling_rate: f64,
}

impl FftProcessor {
    /// Plan a forward FFT of exactly `size` points.
    pub fn new(size: usize, sampling_rate: f64) -> Result<Self, AnalysisError> {
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(AnalysisError::InvalidSamplingRate(sampling_rate));
        }
        if size < MIN_SPECTRAL_SAMPLES {
            return Err(AnalysisError::InsufficientLength {
                needed: MIN_SPECTRAL_SAMPLES,
                available: size,
            });
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);

        Ok(Self {
            fft,
            size,
            sampling_rate,
        })
    }

    /// Transform an already-conditioned signal of length `size`.
    pub fn compute(&self, signal: &[f64]) -> Result<SpectrumResult, AnalysisError> {
        if signal.len() != self.size {
            return Err(AnalysisError::ShapeMismatch {
                left: self.size,
                right: signal.len(),
            });
        }

        let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        self.fft.process(&mut buffer);

        let half = self.size / 2;
        let frequencies = self.frequency_bins();
        let magnitudes: Vec<f64> = buffer.iter().take(half).map(|c| c.norm()).collect();

        // Skip DC; MIN_SPECTRAL_SAMPLES guarantees bin 1 exists
        let peak_idx = first_peak(&magnitudes, 1);

        Ok(SpectrumResult {
            dominant_frequency: frequencies[peak_idx],
            peak_magnitude: magnitudes[peak_idx],
            frequencies,
            magnitudes,
        })
    }

    /// Non-negative half of the frequency axis: `k * fs / N` for `k < floor(N/2)`.
    pub fn frequency_bins(&self) -> Vec<f64> {
        let resolution = self.frequency_resolution();
        (0..self.size / 2).map(|k| k as f64 * resolution).collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Hz per bin
    pub fn frequency_resolution(&self) -> f64 {
        self.sampling_rate / self.size as f64
    }
}

// ============================================================================
// Tests
// ============================================================================

/// Index of the first maximum in `values[from..]`; ties resolve to the lowest
/// index. Returns `from` when the slice is empty past `from`.
fn first_peak(values: &[f64], from: usize) -> usize {
    values
        .iter()
        .enumerate()
        .skip(from)
        .fold((from, f64::NEG_INFINITY), |(best_i, best), (i, &v)| {
            if v > best {
                (i, v)
            } else {
                (best_i, best)
            }
        })
        .0
}
