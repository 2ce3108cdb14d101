//! tremorscope: movement signal analysis for wearable accelerometer data
//!
//! Turns a short tri-axial accelerometer recording into descriptive
//! statistics, cross-axis correlations, a spectrum, a wavelet decomposition,
//! sample entropy and a set of clinical movement indices.
//!
//! ## Layout
//!
//! - **processing**: the stateless numeric pipeline
//! - **acquisition**: request schema and sampling-rate resolution
//! - **config**: TOML service configuration
//! - **api**: axum HTTP host

pub mod acquisition;
pub mod api;
pub mod config;
pub mod processing;
pub mod types;

// Re-export the pipeline entry points
pub use processing::{analyze, analyze_with, spectral_analyze, AnalysisError, AnalysisParams};

// Re-export commonly used types
pub use types::{
    AmplitudeMetrics, AnalysisResult, AxisTriple, ClinicalScores, EntropyValue, SampleSeries,
    SpectrumResult, WaveletResult,
};

// Re-export input schema and service config
pub use acquisition::{SensorInput, SensorReading};
pub use config::ServiceConfig;
