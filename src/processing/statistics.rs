//! Amplitude statistics

use super::conditioning::{mean, population_std};
use super::AnalysisError;
use crate::types::AmplitudeMetrics;

/// Mean, population std, peak (max), min and range of a raw or conditioned series.
pub fn amplitude_metrics(signal: &[f64]) -> Result<AmplitudeMetrics, AnalysisError> {
    let mean_amplitude = mean(signal)?;
    let std_amplitude = population_std(signal)?;
    let peak_amplitude = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_amplitude = signal.iter().copied().fold(f64::INFINITY, f64::min);

    Ok(AmplitudeMetrics {
        mean_amplitude,
        std_amplitude,
        peak_amplitude,
        min_amplitude,
        range_amplitude: peak_amplitude - min_amplitude,
    })
}
