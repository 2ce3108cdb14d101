//! Sensor data acquisition module
//!
//! Turns the wire-level sensor recording into validated core inputs: a
//! finite, equal-length accelerometer [`AxisTriple`](crate::types::AxisTriple)
//! plus the sampling rate the analysis should run at.

pub mod readings;

pub use readings::{estimate_sampling_rate, SensorInput, SensorReading};
