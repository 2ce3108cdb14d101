//! Signal processing module - the movement analysis pipeline
//!
//! Leaves first: conditioning and amplitude statistics feed correlation,
//! spectral, wavelet and entropy analysis, which the clinical module folds
//! into clinical scores. [`analyze`] runs the whole chain.

mod analyzer;
mod clinical;
mod conditioning;
mod correlation;
mod entropy;
mod fft;
mod statistics;
mod wavelet;

pub use analyzer::{analyze, analyze_with, spectral_analyze, AnalysisParams};
pub use clinical::{
    asymmetry_score, bradykinesia_score, clinical_scores, irregularity_score, movement_analysis,
    tremor_score,
};
pub use conditioning::{center, mean, normalize, population_std};
pub use correlation::{p_value_for_r, pearson, unbiased_correlation, SIGNIFICANCE_THRESHOLD};
pub use entropy::{
    sample_entropy, DEFAULT_EMBEDDING_DIM, DEFAULT_TOLERANCE_RATIO,
};
pub use fft::{spectral_analysis, FftProcessor, MIN_SPECTRAL_SAMPLES};
pub use statistics::amplitude_metrics;
pub use wavelet::{
    default_scales, wavelet_decompose, WaveletFamily, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE,
    MORLET_CENTER_FREQUENCY,
};

use thiserror::Error;

/// Errors in signal processing
///
/// All of these are deterministic: retrying the same window cannot change
/// the outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Zero-variance or all-zero input where a division needs spread.
    #[error("Degenerate input: {context}")]
    DegenerateInput { context: String },

    #[error("Insufficient data: need {needed}, have {available}")]
    InsufficientLength { needed: usize, available: usize },

    #[error("Window too long: limit {limit}, have {available}")]
    WindowTooLong { limit: usize, available: usize },

    #[error("Shape mismatch: {left} samples vs {right} samples")]
    ShapeMismatch { left: usize, right: usize },

    #[error("Malformed input: non-finite sample on axis {axis} at index {index}")]
    MalformedInput { axis: &'static str, index: usize },

    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl AnalysisError {
    pub(crate) fn degenerate(context: impl Into<String>) -> Self {
        Self::DegenerateInput {
            context: context.into(),
        }
    }
}
