//! Pipeline Regression Tests
//!
//! End-to-end scenarios through `analyze()` plus the cross-cutting
//! properties every stage must keep (zero-mean centering, correlation
//! symmetry, spectrum shape, wavelet shape, entropy ordering).
//!
//! Noise is drawn from a seeded `StdRng` so every run sees the same input.

use std::f64::consts::PI;

use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use tremorscope::processing::{
    amplitude_metrics, bradykinesia_score, center, mean, normalize, population_std,
    sample_entropy, spectral_analysis, unbiased_correlation, wavelet_decompose, WaveletFamily,
};
use tremorscope::types::Significance;
use tremorscope::{analyze, AnalysisError, AxisTriple};

const FS: f64 = 22.0;

fn sine(n: usize, freq: f64, amplitude: f64, fs: f64) -> Vec<f64> {
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq * i as f64 / fs).sin())
        .collect()
}

fn noise(n: usize, std: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(0.0, std).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

fn assert_all_finite(label: &str, values: &[f64]) {
    assert!(
        values.iter().all(|v| v.is_finite()),
        "{label} contains non-finite values"
    );
}

// ============================================================================
// End-to-End Scenarios
// ============================================================================

/// 2 s of a 5 Hz tremor at 22 Hz with near-silent y and z. The y axis
/// carries a 1e-3 sway at 1 Hz, which is orthogonal to x over whole cycles.
#[test]
fn tremor_window_end_to_end() {
    let n = 44;
    let sway: Vec<f64> = (0..n)
        .map(|i| 1e-3 * (2.0 * PI * i as f64 / FS).cos())
        .collect();
    let triple = AxisTriple::new(sine(n, 5.0, 1.0, FS), sway, noise(n, 1e-3, 2)).unwrap();

    let result = analyze(&triple, FS).unwrap();

    let bin_width = FS / n as f64;
    assert!(
        (result.spectrum.dominant_frequency - 5.0).abs() <= bin_width,
        "dominant = {}",
        result.spectrum.dominant_frequency
    );
    assert!(
        result.correlations.x_y.correlation.abs() < 1e-9,
        "x/y should be uncorrelated, r = {}",
        result.correlations.x_y.correlation
    );
    assert_eq!(result.correlations.x_y.significance, Significance::NotSignificant);
    assert!((result.original_metrics.peak_amplitude - 1.0).abs() < 0.05);
    assert!(result.clinical.bradykinesia_score.is_finite());
    assert!(result.clinical.tremor_score > 0.0);
    assert!(result.entropy.entropy.is_defined());

    assert_all_finite("spectrum", &result.spectrum.magnitudes);
    assert_all_finite("wavelet", result.wavelet.coefficients.as_slice().unwrap());
}

/// A flat x axis must fail loudly instead of producing inf/NaN scores.
#[test]
fn all_zero_axis_is_degenerate() {
    let zeros = vec![0.0; 44];
    let metrics = amplitude_metrics(&zeros).unwrap();
    assert!(matches!(
        bradykinesia_score(&metrics),
        Err(AnalysisError::DegenerateInput { .. })
    ));

    let triple = AxisTriple::new(zeros.clone(), noise(44, 0.1, 3), noise(44, 0.1, 4)).unwrap();
    assert!(matches!(
        analyze(&triple, FS),
        Err(AnalysisError::DegenerateInput { .. })
    ));
}

/// Identical x and y move together: no asymmetry.
#[test]
fn identical_axes_are_symmetric() {
    let x: Vec<f64> = sine(88, 4.0, 0.8, FS)
        .into_iter()
        .zip(noise(88, 0.05, 5))
        .map(|(s, e)| s + e)
        .collect();
    let triple = AxisTriple::new(x.clone(), x, noise(88, 0.1, 6)).unwrap();

    let result = analyze(&triple, FS).unwrap();
    assert!((result.correlations.x_y.correlation - 1.0).abs() < 1e-9);
    assert!(result.clinical.asymmetry_score.abs() < 1e-9);
}

/// The same window at a different sampling rate shifts every frequency axis.
#[test]
fn sampling_rate_is_a_parameter() {
    let n = 44;
    let triple =
        AxisTriple::new(sine(n, 5.0, 1.0, FS), noise(n, 0.01, 7), noise(n, 0.01, 8)).unwrap();

    let slow = analyze(&triple, FS).unwrap();
    let fast = analyze(&triple, 2.0 * FS).unwrap();

    assert!((fast.spectrum.dominant_frequency - 2.0 * slow.spectrum.dominant_frequency).abs() < 1e-9);
    assert!(
        (fast.wavelet.pseudo_frequencies[0] - 2.0 * slow.wavelet.pseudo_frequencies[0]).abs()
            < 1e-9
    );
    assert_eq!(fast.sampling_rate_hz, 2.0 * FS);
}

#[test]
fn too_short_window_rejected() {
    let triple = AxisTriple::new(vec![0.1, 0.2, 0.3], vec![0.3, 0.2, 0.1], vec![0.0, 1.0, 0.0])
        .unwrap();
    assert!(matches!(
        analyze(&triple, FS),
        Err(AnalysisError::InsufficientLength { needed: 4, available: 3 })
    ));
}

// ============================================================================
// Stage Properties
// ============================================================================

#[test]
fn centering_and_normalization_properties() {
    for seed in 0..5 {
        let signal: Vec<f64> = noise(100, 2.0, seed).into_iter().map(|v| v + 7.5).collect();

        let centered = center(&signal).unwrap();
        assert!(mean(&centered).unwrap().abs() < 1e-12);

        let normalized = normalize(&signal).unwrap();
        assert!(mean(&normalized).unwrap().abs() < 1e-12);
        assert!((population_std(&normalized).unwrap() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn correlation_is_symmetric_and_self_correlation_is_one() {
    let a = noise(64, 1.0, 11);
    let b: Vec<f64> = a
        .iter()
        .zip(noise(64, 1.0, 12))
        .map(|(x, e)| 0.5 * x + e)
        .collect();

    let ab = unbiased_correlation(&a, &b).unwrap();
    let ba = unbiased_correlation(&b, &a).unwrap();
    assert_eq!(ab.correlation, ba.correlation);

    let aa = unbiased_correlation(&a, &a).unwrap();
    assert!((aa.correlation - 1.0).abs() < 1e-12);
}

#[test]
fn spectrum_shape_and_peak() {
    for (n, f0) in [(44, 5.0), (45, 3.0), (100, 7.3)] {
        let spectrum = spectral_analysis(&sine(n, f0, 1.0, FS), FS).unwrap();
        assert_eq!(spectrum.frequencies.len(), n / 2);
        assert_eq!(spectrum.magnitudes.len(), n / 2);
        assert!(
            (spectrum.dominant_frequency - f0).abs() <= FS / n as f64,
            "n = {n}, f0 = {f0}, dominant = {}",
            spectrum.dominant_frequency
        );
    }
}

#[test]
fn periodic_signal_has_lower_entropy_than_noise() {
    let n = 200;
    let periodic = sine(n, 2.0, 1.0, 20.0);
    let white = noise(n, 1.0 / 2f64.sqrt(), 21);

    let periodic = sample_entropy(&periodic, 2, 0.2).unwrap();
    let white = sample_entropy(&white, 2, 0.2).unwrap();

    assert!(periodic.entropy.is_defined());
    assert!(white.entropy.is_defined());
    assert!(
        periodic.entropy.value_or_sentinel() < white.entropy.value_or_sentinel(),
        "periodic {:?} vs noise {:?}",
        periodic.entropy,
        white.entropy
    );
}

#[test]
fn wavelet_shape_matches_scales_and_length() {
    let signal = sine(60, 3.0, 1.0, FS);
    for scales in [vec![1], vec![1, 2, 3, 4], (1..=31).collect::<Vec<u32>>()] {
        let result = wavelet_decompose(&signal, &scales, WaveletFamily::Morlet, FS).unwrap();
        assert_eq!(result.coefficients.nrows(), scales.len());
        assert_eq!(result.coefficients.ncols(), 60);
        assert_eq!(result.pseudo_frequencies.len(), scales.len());
    }
}
