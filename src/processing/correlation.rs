//! Cross-axis correlation engine
//!
//! Pearson correlation of mean-removed axis signals with a two-sided p-value
//! from Student's t-distribution (statrs). Centering keeps each axis's scale,
//! so the coefficient reflects covariance structure without DC offset.

use statrs::distribution::{ContinuousCDF, StudentsT};

use super::conditioning::{center, is_degenerate_spread, population_std};
use super::AnalysisError;
use crate::types::{CorrelationResult, Significance};

/// p-value below which a correlation is labelled "significant".
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Center both series and correlate them.
///
/// Fails with `ShapeMismatch` on unequal lengths and `DegenerateInput` when
/// either series has zero variance (the coefficient is undefined there).
pub fn unbiased_correlation(
    signal_a: &[f64],
    signal_b: &[f64],
) -> Result<CorrelationResult, AnalysisError> {
    if signal_a.len() != signal_b.len() {
        return Err(AnalysisError::ShapeMismatch {
            left: signal_a.len(),
            right: signal_b.len(),
        });
    }
    if signal_a.len() < 2 {
        return Err(AnalysisError::InsufficientLength {
            needed: 2,
            available: signal_a.len(),
        });
    }

    let a = center(signal_a)?;
    let b = center(signal_b)?;

    let r = pearson(&a, &b)?;
    let p_value = p_value_for_r(r, a.len());

    Ok(CorrelationResult {
        correlation: r,
        p_value,
        significance: Significance::from_p_value(p_value, SIGNIFICANCE_THRESHOLD),
    })
}

/// Pearson correlation coefficient
///
/// Formula: r = Σ[(xi - x̄)(yi - ȳ)] / sqrt(Σ(xi - x̄)² × Σ(yi - ȳ)²)
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::ShapeMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    for (label, s) in [("first", x), ("second", y)] {
        let std = population_std(s)?;
        if is_degenerate_spread(std, s) {
            return Err(AnalysisError::degenerate(format!(
                "correlation undefined: {label} signal has zero variance"
            )));
        }
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Two-tailed p-value for r under H0: no correlation.
///
/// t = r × sqrt(n-2) / sqrt(1-r²) with n-2 degrees of freedom.
pub fn p_value_for_r(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }

    let r_squared = r * r;
    if r_squared >= 1.0 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t_stat = r * df.sqrt() / (1.0 - r_squared).sqrt();

    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * (1.0 - t_dist.cdf(t_stat.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}
