//! Sensor recording schema and validation

use serde::{Deserialize, Serialize};

use crate::processing::AnalysisError;
use crate::types::{AxisTriple, SampleSeries};

/// Timestamps above this are epoch milliseconds rather than seconds.
const MILLISECOND_TIMESTAMP_THRESHOLD: f64 = 1e11;

/// One tri-axial sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp: f64,
}

/// A recording window as posted by a wearable or phone client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorInput {
    pub accelerometer: Vec<SensorReading>,

    /// Accepted and validated, not used by the analysis.
    #[serde(default)]
    pub gyroscope: Vec<SensorReading>,

    /// Explicit sampling rate; overrides config and timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate_hz: Option<f64>,
}

impl SensorInput {
    /// Validate the accelerometer records and split them into axes.
    pub fn accelerometer_triple(&self) -> Result<AxisTriple, AnalysisError> {
        validate_readings(&self.accelerometer, ["accelerometer.x", "accelerometer.y", "accelerometer.z"])?;
        validate_readings(&self.gyroscope, ["gyroscope.x", "gyroscope.y", "gyroscope.z"])?;

        AxisTriple::new(
            self.accelerometer.iter().map(|r| r.x).collect(),
            self.accelerometer.iter().map(|r| r.y).collect(),
            self.accelerometer.iter().map(|r| r.z).collect(),
        )
    }

    /// Validated accelerometer x axis only.
    pub fn accelerometer_x(&self) -> Result<SampleSeries, AnalysisError> {
        SampleSeries::new(
            self.accelerometer.iter().map(|r| r.x).collect(),
            "accelerometer.x",
        )
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.accelerometer.iter().map(|r| r.timestamp).collect()
    }

    /// Sampling rate for this window.
    ///
    /// Order: explicit `sampling_rate_hz`, then the timestamp-derived rate
    /// when `derive` is set and derivation succeeds, then `default_hz`.
    pub fn resolve_sampling_rate(&self, default_hz: f64, derive: bool) -> Result<f64, AnalysisError> {
        if let Some(fs) = self.sampling_rate_hz {
            if !fs.is_finite() || fs <= 0.0 {
                return Err(AnalysisError::InvalidSamplingRate(fs));
            }
            return Ok(fs);
        }

        if derive {
            if let Some(fs) = estimate_sampling_rate(&self.timestamps()) {
                tracing::debug!(fs = fs, "Sampling rate derived from timestamps");
                return Ok(fs);
            }
            tracing::debug!(default_hz = default_hz, "Timestamps unusable, using default sampling rate");
        }

        Ok(default_hz)
    }
}

fn validate_readings(readings: &[SensorReading], labels: [&'static str; 3]) -> Result<(), AnalysisError> {
    for (index, r) in readings.iter().enumerate() {
        for (value, axis) in [r.x, r.y, r.z].into_iter().zip(labels) {
            if !value.is_finite() {
                return Err(AnalysisError::MalformedInput { axis, index });
            }
        }
        if !r.timestamp.is_finite() {
            return Err(AnalysisError::MalformedInput {
                axis: "timestamp",
                index,
            });
        }
    }
    Ok(())
}

/// Reciprocal of the median positive timestamp step.
///
/// Returns `None` with fewer than two increasing timestamps.
pub fn estimate_sampling_rate(timestamps: &[f64]) -> Option<f64> {
    let mut deltas: Vec<f64> = timestamps
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| d.is_finite() && *d > 0.0)
        .collect();
    if deltas.is_empty() {
        return None;
    }

    deltas.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = deltas.len() / 2;
    let median = if deltas.len() % 2 == 0 {
        (deltas[mid - 1] + deltas[mid]) / 2.0
    } else {
        deltas[mid]
    };

    let in_millis = timestamps
        .first()
        .is_some_and(|t| t.abs() > MILLISECOND_TIMESTAMP_THRESHOLD);
    let step_secs = if in_millis { median / 1000.0 } else { median };

    let fs = 1.0 / step_secs;
    fs.is_finite().then_some(fs)
}
