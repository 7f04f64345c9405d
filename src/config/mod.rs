//! Service Configuration Module
//!
//! Server address, search defaults and limits, and the catalog source, loaded
//! from TOML.
//!
//! ## Loading Order
//!
//! 1. `ZONEBREW_CONFIG` environment variable (path to TOML file)
//! 2. `zonebrew.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(ServiceConfig::load());
//!
//! // Anywhere in the codebase:
//! let top_k = config::get().solver.default_top_k;
//! ```

mod service_config;
pub mod defaults;
pub mod validation;

pub use service_config::*;

use std::sync::OnceLock;

/// Global service configuration, initialized once at startup.
static SERVICE_CONFIG: OnceLock<ServiceConfig> = OnceLock::new();

/// Initialize the global service configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: ServiceConfig) {
    for w in validation::suspicious_values(&config) {
        tracing::warn!(field = %w.field, "{}", w);
    }
    if SERVICE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global service configuration.
///
/// Panics if `init()` has not been called: a missing config is a startup bug.
pub fn get() -> &'static ServiceConfig {
    SERVICE_CONFIG
        .get()
        .expect("config::get() called before config::init(), this is a startup bug")
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    SERVICE_CONFIG.get().is_some()
}
