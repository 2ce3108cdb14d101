//! Service Configuration Module
//!
//! Provides service configuration loaded from TOML files. Analysis defaults
//! (sampling rate, entropy and wavelet parameters) live here so operators can
//! tune them without a rebuild.
//!
//! ## Loading Order
//!
//! 1. `TREMORSCOPE_CONFIG` environment variable (path to TOML file)
//! 2. `tremorscope.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded [`ServiceConfig`] is handed to the router state; there is no
//! process-wide config singleton.

mod service_config;
pub mod defaults;
pub mod validation;

pub use service_config::*;
