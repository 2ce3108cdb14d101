//! Centering and z-normalization primitives

use super::AnalysisError;

/// Relative spread below which a series counts as constant.
///
/// The mean of a constant float series can be off by an ulp, leaving a
/// standard deviation of ~1e-17 instead of exactly zero.
const DEGENERATE_STD_RATIO: f64 = 1e-12;

/// Arithmetic mean. Fails on an empty series.
pub fn mean(signal: &[f64]) -> Result<f64, AnalysisError> {
    if signal.is_empty() {
        return Err(AnalysisError::InsufficientLength {
            needed: 1,
            available: 0,
        });
    }
    Ok(signal.iter().sum::<f64>() / signal.len() as f64)
}

/// Population standard deviation (divides by N).
pub fn population_std(signal: &[f64]) -> Result<f64, AnalysisError> {
    let mu = mean(signal)?;
    let variance = signal.iter().map(|s| (s - mu).powi(2)).sum::<f64>() / signal.len() as f64;
    Ok(variance.sqrt())
}

/// Subtract the mean; output mean is ~0.
pub fn center(signal: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let mu = mean(signal)?;
    Ok(signal.iter().map(|s| s - mu).collect())
}

/// Subtract the mean and divide by the population standard deviation.
///
/// A constant series has no spread to divide by and is rejected as
/// `DegenerateInput` instead of producing NaN/Inf.
pub fn normalize(signal: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let mu = mean(signal)?;
    let std = population_std(signal)?;
    if is_degenerate_spread(std, signal) {
        return Err(AnalysisError::degenerate(
            "cannot normalize a constant signal (std = 0)",
        ));
    }
    Ok(signal.iter().map(|s| (s - mu) / std).collect())
}

/// True when `std` is zero relative to the magnitude of `signal`.
pub(crate) fn is_degenerate_spread(std: f64, signal: &[f64]) -> bool {
    let magnitude = signal.iter().fold(1.0_f64, |acc, s| acc.max(s.abs()));
    !std.is_finite() || std <= DEGENERATE_STD_RATIO * magnitude
}
