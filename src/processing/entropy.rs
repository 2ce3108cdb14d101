//! Sample entropy of an accelerometer axis
//!
//! Matching runs on the z-normalized signal, but the tolerance is
//! `r = r_ratio * std(original)`: the absolute tolerance follows the raw
//! signal's spread while comparisons happen in normalized units.
//!
//! Counting differs from the textbook SampEn in two ways:
//!
//! - self-matches (`i == j`) are counted;
//! - both embedding dimensions build templates at the same `N - m` start
//!   indices, so the `m + 1` pass keeps its last template. Candidates are
//!   scanned over `N - len` start indices for a window of length `len`.
//!
//! With a positive tolerance this gives `B >= N - m` and `A >= N - m - 1`:
//! the last `m + 1` template has no self-match among the candidates.

use super::conditioning::normalize;
use super::statistics::amplitude_metrics;
use super::AnalysisError;
use crate::types::{EntropyResult, EntropyValue};

/// Default embedding dimension m.
pub const DEFAULT_EMBEDDING_DIM: usize = 2;

/// Default tolerance ratio applied to the original standard deviation.
pub const DEFAULT_TOLERANCE_RATIO: f64 = 0.2;

/// Sample entropy over the normalized `signal`, with the amplitude metrics
/// of the original signal attached.
///
/// Requires `signal.len() >= m + 2` and a non-constant signal.
pub fn sample_entropy(
    signal: &[f64],
    m: usize,
    r_ratio: f64,
) -> Result<EntropyResult, AnalysisError> {
    if m == 0 {
        return Err(AnalysisError::InvalidParameter(
            "embedding dimension must be >= 1".to_string(),
        ));
    }
    if !r_ratio.is_finite() || r_ratio <= 0.0 {
        return Err(AnalysisError::InvalidParameter(format!(
            "tolerance ratio must be a positive finite number, got {r_ratio}"
        )));
    }
    let n = signal.len();
    if n < m + 2 {
        return Err(AnalysisError::InsufficientLength {
            needed: m + 2,
            available: n,
        });
    }

    let amplitude = amplitude_metrics(signal)?;
    let normalized = normalize(signal)?;
    let r = r_ratio * amplitude.std_amplitude;

    let templates = n - m;
    let b = count_matches(&normalized, m, templates, n - m, r);
    let a = count_matches(&normalized, m + 1, templates, n - m - 1, r);

    let entropy = if a > 0 && b > 0 {
        // normalizes -0.0
        EntropyValue::Computed(-(a as f64 / b as f64).ln() + 0.0)
    } else {
        EntropyValue::Undefined
    };

    tracing::debug!(
        samples = n,
        m = m,
        tolerance = r,
        template_matches = b,
        extended_matches = a,
        entropy = entropy.value_or_sentinel(),
        "Sample entropy computed"
    );

    Ok(EntropyResult {
        entropy,
        amplitude_metrics: amplitude,
        template_matches: b,
        extended_matches: a,
    })
}

/// Total pairs `(i, j)`, `i` in `0..templates` and `j` in `0..candidates`,
/// whose length-`len` windows lie within Chebyshev distance `< r`.
///
/// Callers guarantee `templates - 1 + len <= data.len()` and
/// `candidates - 1 + len <= data.len()`.
fn count_matches(data: &[f64], len: usize, templates: usize, candidates: usize, r: f64) -> u64 {
    let mut total = 0u64;
    for i in 0..templates {
        let template = &data[i..i + len];
        for j in 0..candidates {
            let candidate = &data[j..j + len];
            let within = template
                .iter()
                .zip(candidate)
                .all(|(t, c)| (t - c).abs() < r);
            if within {
                total += 1;
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use std::f64::consts::PI;

    #[test]
    fn test_periodic_lower_than_noise() {
        let n = 200;
        let periodic: Vec<f64> = (0..n).map(|i| (2.0 * PI * i as f64 / 10.0).sin()).collect();

        let mut rng = StdRng::seed_from_u64(42);
        let normal = Normal::new(0.0, 1.0 / 2.0_f64.sqrt()).unwrap();
        let noise: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();

        let regular = sample_entropy(&periodic, 2, 0.2).unwrap();
        let irregular = sample_entropy(&noise, 2, 0.2).unwrap();

        assert!(regular.entropy.is_defined() && irregular.entropy.is_defined());
        assert!(
            regular.entropy.value_or_sentinel() < irregular.entropy.value_or_sentinel(),
            "periodic {:?} vs noise {:?}",
            regular.entropy,
            irregular.entropy
        );
    }

    #[test]
    fn test_self_matches_are_counted() {
        // Tiny tolerance: only self-matches survive. N = 6, m = 2 gives
        // 4 self-matches at m and 3 at m + 1 (last template has no candidate)
        let signal = [0.0, 3.0, 1.0, 7.0, 2.0, 5.0];
        let result = sample_entropy(&signal, 2, 1e-9).unwrap();
        assert_eq!(result.template_matches, 4);
        assert_eq!(result.extended_matches, 3);
        match result.entropy {
            EntropyValue::Computed(v) => assert!((v - (4.0f64 / 3.0).ln()).abs() < 1e-12),
            other => panic!("expected a computed entropy, got {other:?}"),
        }
    }

    #[test]
    fn test_extended_pass_scans_one_fewer_candidate() {
        // m = 1, N = 4, large tolerance: every pair matches.
        // B = 3 templates x 3 candidates, A = 3 templates x 2 candidates
        let result = sample_entropy(&[1.0, 2.0, 3.0, 4.0], 1, 100.0).unwrap();
        assert_eq!(result.template_matches, 9);
        assert_eq!(result.extended_matches, 6);
        match result.entropy {
            EntropyValue::Computed(v) => assert!((v - 1.5f64.ln()).abs() < 1e-12),
            other => panic!("expected a computed entropy, got {other:?}"),
        }
    }

    #[test]
    fn test_extended_matches_strictly_fewer() {
        // The last template's self-match is counted in B only, so A < B
        // and a computed entropy is strictly positive, never -0.0
        let mut rng = StdRng::seed_from_u64(9);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let noise: Vec<f64> = (0..80).map(|_| normal.sample(&mut rng)).collect();
        let result = sample_entropy(&noise, 2, 0.2).unwrap();
        assert!(result.extended_matches < result.template_matches);
        let v = result.entropy.value_or_sentinel();
        assert!(v > 0.0 && v.is_sign_positive(), "entropy = {v}");
    }

    #[test]
    fn test_original_metrics_reported() {
        let signal: Vec<f64> = (0..30).map(|i| 9.81 + (i as f64 * 0.9).sin()).collect();
        let result = sample_entropy(&signal, 2, 0.2).unwrap();
        assert!((result.amplitude_metrics.mean_amplitude - 9.81).abs() < 0.2);
        assert!(result.amplitude_metrics.peak_amplitude > 10.5);
    }

    #[test]
    fn test_entropy_non_negative() {
        let mut rng = StdRng::seed_from_u64(3);
        let normal = Normal::new(0.0, 2.0).unwrap();
        let noise: Vec<f64> = (0..120).map(|_| normal.sample(&mut rng)).collect();
        let result = sample_entropy(&noise, 2, 0.2).unwrap();
        assert!(result.extended_matches <= result.template_matches);
        assert!(result.entropy.value_or_sentinel() >= 0.0);
    }

    #[test]
    fn test_short_signal_rejected() {
        let err = sample_entropy(&[1.0, 2.0, 3.0], 2, 0.2).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientLength { needed: 4, available: 3 }
        ));
    }

    #[test]
    fn test_constant_signal_is_degenerate() {
        let err = sample_entropy(&[2.0; 20], 2, 0.2).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(sample_entropy(&[1.0, 2.0, 3.0, 4.0], 0, 0.2).is_err());
        assert!(sample_entropy(&[1.0, 2.0, 3.0, 4.0], 2, 0.0).is_err());
        assert!(sample_entropy(&[1.0, 2.0, 3.0, 4.0], 2, f64::NAN).is_err());
    }
}
