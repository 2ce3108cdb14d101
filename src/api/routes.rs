//! API route definitions
//!
//! - `GET /` - service banner
//! - `GET /health` - liveness
//! - `POST /fft` - x-axis half-spectrum
//! - `POST /analyze_signal` - full movement analysis

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, ApiState};

/// Create all API routes
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/fft", post(handlers::fft))
        .route("/analyze_signal", post(handlers::analyze_signal))
        .with_state(state)
}
