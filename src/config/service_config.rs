//! Service Configuration - server settings and analysis defaults as TOML values
//!
//! Each struct implements `Default` with the values the service ships with,
//! so a missing config file changes nothing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::processing::{
    AnalysisParams, WaveletFamily, DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE,
    DEFAULT_TOLERANCE_RATIO, MIN_SPECTRAL_SAMPLES,
};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "TREMORSCOPE_CONFIG";
/// Environment variable overriding `server.addr`.
pub const SERVER_ADDR_ENV: &str = "TREMORSCOPE_SERVER_ADDR";
/// Environment variable overriding `server.cors_origins` (comma-separated).
pub const CORS_ORIGINS_ENV: &str = "TREMORSCOPE_CORS_ORIGINS";

const LOCAL_CONFIG_FILE: &str = "tremorscope.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a deployment.
///
/// Load with `ServiceConfig::load()` which searches:
/// 1. `$TREMORSCOPE_CONFIG` env var
/// 2. `./tremorscope.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Signal analysis defaults
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl ServiceConfig {
    /// Load configuration using the standard search order.
    ///
    /// A broken file is logged and skipped; the next source is tried.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", CONFIG_PATH_ENV);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_PATH_ENV);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_PATH_ENV);
            }
        }

        // 2. Check ./tremorscope.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Two-pass: unknown keys are reported as warnings first, then the
    /// document is deserialized and validated.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TREMORSCOPE_SERVER_ADDR` and `TREMORSCOPE_CORS_ORIGINS`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var(SERVER_ADDR_ENV) {
            info!(addr = %addr, "Server address overridden by {}", SERVER_ADDR_ENV);
            self.server.addr = addr;
        }
        if let Ok(origins) = std::env::var(CORS_ORIGINS_ENV) {
            self.server.cors_origins = parse_origins(&origins);
            info!(origins = %origins, "CORS origins overridden by {}", CORS_ORIGINS_ENV);
        }
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - Sampling rate must be finite and > 0
    /// - Entropy embedding dimension >= 1, tolerance ratio > 0
    /// - 1 <= wavelet_min_scale <= wavelet_max_scale
    /// - min_samples >= 4 (one non-DC spectral bin)
    /// - max_samples >= min_samples
    /// - Timeout and body limit > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;
        let s = &self.server;
        let mut errors: Vec<String> = Vec::new();

        if !a.sampling_rate_hz.is_finite() || a.sampling_rate_hz <= 0.0 {
            errors.push(format!(
                "analysis.sampling_rate_hz must be a positive finite number, got {}",
                a.sampling_rate_hz
            ));
        }
        if a.entropy_embedding_dim == 0 {
            errors.push("analysis.entropy_embedding_dim must be >= 1".to_string());
        }
        if !a.entropy_tolerance_ratio.is_finite() || a.entropy_tolerance_ratio <= 0.0 {
            errors.push(format!(
                "analysis.entropy_tolerance_ratio must be > 0, got {}",
                a.entropy_tolerance_ratio
            ));
        }
        if a.wavelet_min_scale == 0 {
            errors.push("analysis.wavelet_min_scale must be >= 1".to_string());
        }
        if a.wavelet_min_scale > a.wavelet_max_scale {
            errors.push(format!(
                "analysis.wavelet_min_scale ({}) must be <= wavelet_max_scale ({})",
                a.wavelet_min_scale, a.wavelet_max_scale
            ));
        }
        if a.min_samples < MIN_SPECTRAL_SAMPLES {
            errors.push(format!(
                "analysis.min_samples must be >= {MIN_SPECTRAL_SAMPLES}, got {}",
                a.min_samples
            ));
        }
        if a.max_samples < a.min_samples {
            errors.push(format!(
                "analysis.max_samples ({}) must be >= min_samples ({})",
                a.max_samples, a.min_samples
            ));
        }
        if s.request_timeout_secs == 0 {
            errors.push("server.request_timeout_secs must be > 0".to_string());
        }
        if s.max_body_bytes == 0 {
            errors.push("server.max_body_bytes must be > 0".to_string());
        }

        for w in super::validation::validate_ranges(self) {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `TREMORSCOPE_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Browser origins allowed to call the API. Empty = same-origin only.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

fn default_cors_origins() -> Vec<String> {
    defaults::CORS_ORIGINS.iter().map(|s| (*s).to_string()).collect()
}

fn default_request_timeout_secs() -> u64 {
    defaults::REQUEST_TIMEOUT_SECS
}

fn default_max_body_bytes() -> usize {
    defaults::MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            cors_origins: default_cors_origins(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sampling rate used when the request does not carry one (Hz)
    #[serde(default = "default_sampling_rate_hz")]
    pub sampling_rate_hz: f64,

    /// Estimate the rate from record timestamps before falling back to
    /// `sampling_rate_hz`
    #[serde(default)]
    pub derive_sampling_rate: bool,

    /// Sample entropy embedding dimension (m)
    #[serde(default = "default_entropy_embedding_dim")]
    pub entropy_embedding_dim: usize,

    /// Sample entropy tolerance as a fraction of the original std
    #[serde(default = "default_entropy_tolerance_ratio")]
    pub entropy_tolerance_ratio: f64,

    #[serde(default = "default_wavelet_min_scale")]
    pub wavelet_min_scale: u32,

    #[serde(default = "default_wavelet_max_scale")]
    pub wavelet_max_scale: u32,

    #[serde(default)]
    pub wavelet_family: WaveletFamily,

    /// Shortest accepted window (samples)
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Longest accepted window (samples)
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
}

fn default_sampling_rate_hz() -> f64 {
    defaults::SAMPLING_RATE_HZ
}

fn default_entropy_embedding_dim() -> usize {
    DEFAULT_EMBEDDING_DIM
}

fn default_entropy_tolerance_ratio() -> f64 {
    DEFAULT_TOLERANCE_RATIO
}

fn default_wavelet_min_scale() -> u32 {
    DEFAULT_MIN_SCALE
}

fn default_wavelet_max_scale() -> u32 {
    DEFAULT_MAX_SCALE
}

fn default_min_samples() -> usize {
    MIN_SPECTRAL_SAMPLES
}

fn default_max_samples() -> usize {
    defaults::MAX_SAMPLES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: default_sampling_rate_hz(),
            derive_sampling_rate: false,
            entropy_embedding_dim: default_entropy_embedding_dim(),
            entropy_tolerance_ratio: default_entropy_tolerance_ratio(),
            wavelet_min_scale: default_wavelet_min_scale(),
            wavelet_max_scale: default_wavelet_max_scale(),
            wavelet_family: WaveletFamily::default(),
            min_samples: default_min_samples(),
            max_samples: default_max_samples(),
        }
    }
}

impl AnalysisConfig {
    /// Pipeline parameters for a window sampled at `sampling_rate_hz`.
    pub fn params(&self, sampling_rate_hz: f64) -> AnalysisParams {
        AnalysisParams {
            sampling_rate_hz,
            embedding_dim: self.entropy_embedding_dim,
            tolerance_ratio: self.entropy_tolerance_ratio,
            wavelet_scales: (self.wavelet_min_scale..=self.wavelet_max_scale).collect(),
            wavelet_family: self.wavelet_family,
        }
    }
}
