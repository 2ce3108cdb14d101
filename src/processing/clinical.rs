//! Clinical index synthesis
//!
//! Deterministic scores folded from the upstream metrics; nothing here
//! touches the raw signal. Scores are deliberately not clamped: bradykinesia
//! and tremor scores leave [0, 1] on pathological or noisy windows and
//! callers see that as-is.

use super::AnalysisError;
use crate::types::{
    AmplitudeMetrics, ClinicalScores, CorrelationResult, EntropyResult, MovementAnalysis,
    SpectrumResult,
};

/// `1 - mean / peak` of the original x-axis amplitude.
///
/// An all-zero window has no peak to divide by and is `DegenerateInput`.
pub fn bradykinesia_score(metrics: &AmplitudeMetrics) -> Result<f64, AnalysisError> {
    if metrics.peak_amplitude.abs() < f64::EPSILON {
        return Err(AnalysisError::degenerate(
            "bradykinesia score undefined: peak amplitude is zero",
        ));
    }
    finite(
        1.0 - metrics.mean_amplitude / metrics.peak_amplitude,
        "bradykinesia score",
    )
}

/// Non-DC spectral peak relative to the amplitude standard deviation.
pub fn tremor_score(tremor_amplitude: f64, std_amplitude: f64) -> Result<f64, AnalysisError> {
    if std_amplitude.abs() < f64::EPSILON {
        return Err(AnalysisError::degenerate(
            "tremor score undefined: amplitude std is zero",
        ));
    }
    finite(tremor_amplitude / std_amplitude, "tremor score")
}

/// Sample entropy passed through, `Undefined` collapsing to the 0.0 sentinel.
pub fn irregularity_score(entropy: &EntropyResult) -> f64 {
    entropy.entropy.value_or_sentinel()
}

/// `1 - |r(x, y)|`: 0 = symmetric, 1 = asymmetric.
pub fn asymmetry_score(xy: &CorrelationResult) -> f64 {
    1.0 - xy.correlation.abs()
}

/// Fold the pipeline outputs into the four clinical indices.
pub fn clinical_scores(
    metrics: &AmplitudeMetrics,
    spectrum: &SpectrumResult,
    entropy: &EntropyResult,
    xy: &CorrelationResult,
) -> Result<ClinicalScores, AnalysisError> {
    Ok(ClinicalScores {
        bradykinesia_score: bradykinesia_score(metrics)?,
        tremor_score: tremor_score(spectrum.peak_magnitude, metrics.std_amplitude)?,
        irregularity_score: irregularity_score(entropy),
        asymmetry_score: asymmetry_score(xy),
    })
}

/// Gross movement summary from the x-axis metrics and the x/y correlation.
pub fn movement_analysis(metrics: &AmplitudeMetrics, xy: &CorrelationResult) -> MovementAnalysis {
    MovementAnalysis {
        movement_intensity: metrics.mean_amplitude,
        movement_variability: metrics.std_amplitude,
        peak_movement: metrics.peak_amplitude,
        axis_symmetry: xy.correlation,
    }
}

fn finite(value: f64, what: &str) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::degenerate(format!("{what} is not finite")))
    }
}
