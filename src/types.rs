//! Core value types for movement signal analysis
//!
//! Every type here is a request-scoped value object: built from the incoming
//! sensor window, never mutated in place, dropped when the response is sent.

use ndarray::Array2;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use crate::processing::AnalysisError;

// ============================================================================
// Input Series
// ============================================================================

/// An ordered, non-empty sequence of finite samples from one sensor axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    samples: Vec<f64>,
}

impl SampleSeries {
    /// Build a series, rejecting empty input and non-finite samples.
    ///
    /// `axis` only labels the error.
    pub fn new(samples: Vec<f64>, axis: &'static str) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::InsufficientLength {
                needed: 1,
                available: 0,
            });
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::MalformedInput { axis, index });
        }
        Ok(Self { samples })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl AsRef<[f64]> for SampleSeries {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

/// Three equal-length axis series sharing one timestamp base.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTriple {
    pub x: SampleSeries,
    pub y: SampleSeries,
    pub z: SampleSeries,
}

impl AxisTriple {
    /// Build a triple from raw axis vectors.
    ///
    /// Fails with `MalformedInput` on any non-finite sample and with
    /// `ShapeMismatch` when the axes differ in length.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self, AnalysisError> {
        let x = SampleSeries::new(x, "x")?;
        let y = SampleSeries::new(y, "y")?;
        let z = SampleSeries::new(z, "z")?;

        for other in [&y, &z] {
            if other.len() != x.len() {
                return Err(AnalysisError::ShapeMismatch {
                    left: x.len(),
                    right: other.len(),
                });
            }
        }

        Ok(Self { x, y, z })
    }

    /// Number of samples per axis.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reject windows shorter than `needed` samples.
    pub fn ensure_min_len(&self, needed: usize) -> Result<(), AnalysisError> {
        if self.len() < needed {
            return Err(AnalysisError::InsufficientLength {
                needed,
                available: self.len(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Derived Results
// ============================================================================

/// Descriptive amplitude statistics of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeMetrics {
    pub mean_amplitude: f64,
    /// Population standard deviation (ddof = 0)
    pub std_amplitude: f64,
    pub peak_amplitude: f64,
    pub min_amplitude: f64,
    /// `peak - min`, never negative
    pub range_amplitude: f64,
}

/// Thresholded annotation of a correlation p-value.
///
/// This is a convenience label at p < 0.05, not a confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Significance {
    #[serde(rename = "significant")]
    Significant,
    #[serde(rename = "not significant")]
    NotSignificant,
}

impl Significance {
    pub fn from_p_value(p_value: f64, threshold: f64) -> Self {
        if p_value < threshold {
            Self::Significant
        } else {
            Self::NotSignificant
        }
    }
}

/// Pearson correlation of two mean-removed series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub correlation: f64,
    pub p_value: f64,
    pub significance: Significance,
}

/// Correlations between every pair of accelerometer axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCorrelations {
    pub x_y: CorrelationResult,
    pub x_z: CorrelationResult,
    pub y_z: CorrelationResult,
}

/// Half-spectrum of a centered series.
///
/// `frequencies.len() == magnitudes.len() == floor(N / 2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumResult {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
    /// Frequency of the largest non-DC bin (Hz)
    pub dominant_frequency: f64,
    /// Magnitude of the largest non-DC bin
    pub peak_magnitude: f64,
}

/// Continuous wavelet decomposition: one coefficient row per scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveletResult {
    #[serde(serialize_with = "serialize_rows")]
    pub coefficients: Array2<f64>,
    /// Pseudo-frequency per scale (Hz)
    pub pseudo_frequencies: Vec<f64>,
    pub scales: Vec<u32>,
}

pub(crate) fn serialize_rows<S: Serializer>(matrix: &Array2<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(matrix.nrows()))?;
    for row in matrix.rows() {
        seq.serialize_element(&row.to_vec())?;
    }
    seq.end()
}

/// Sample entropy outcome.
///
/// `Undefined` means no template matches were found at one of the two
/// embedding dimensions, which is distinct from a computed value of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntropyValue {
    Computed(f64),
    Undefined,
}

impl EntropyValue {
    /// Numeric value with the legacy `0.0` sentinel for `Undefined`.
    pub fn value_or_sentinel(self) -> f64 {
        match self {
            Self::Computed(v) => v,
            Self::Undefined => 0.0,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Self::Computed(_))
    }

    pub fn status(self) -> &'static str {
        match self {
            Self::Computed(_) => "computed",
            Self::Undefined => "undefined",
        }
    }
}

/// Sample entropy with the amplitude metrics of the unnormalized input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyResult {
    pub entropy: EntropyValue,
    pub amplitude_metrics: AmplitudeMetrics,
    /// Total matches at embedding dimension m (B)
    pub template_matches: u64,
    /// Total matches at embedding dimension m + 1 (A)
    pub extended_matches: u64,
}

/// Summary of gross movement taken from the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementAnalysis {
    pub movement_intensity: f64,
    pub movement_variability: f64,
    pub peak_movement: f64,
    pub axis_symmetry: f64,
}

/// Clinical indices. None of these are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClinicalScores {
    pub bradykinesia_score: f64,
    pub tremor_score: f64,
    pub irregularity_score: f64,
    /// 0 = symmetric, 1 = asymmetric
    pub asymmetry_score: f64,
}

/// Everything computed for one accelerometer window.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub sampling_rate_hz: f64,
    pub original_metrics: AmplitudeMetrics,
    pub correlations: AxisCorrelations,
    pub spectrum: SpectrumResult,
    pub wavelet: WaveletResult,
    pub entropy: EntropyResult,
    pub movement: MovementAnalysis,
    pub clinical: ClinicalScores,
}
