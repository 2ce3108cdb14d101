//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8000";

/// Browser origins allowed by default (Vite dev server, Expo web).
pub const CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:8081"];

/// Per-request timeout (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum accepted request body (bytes). 8 MiB.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// Analysis
// ============================================================================

/// Sampling rate of the reference wearable (Hz).
pub const SAMPLING_RATE_HZ: f64 = 22.0;

/// Longest accepted window (samples). Sample entropy is quadratic in it.
pub const MAX_SAMPLES: usize = 4096;
