//! Service Configuration - server, solver and catalog settings as TOML values
//!
//! Every struct implements `Default` with the values from [`super::defaults`],
//! so a missing file or a partial file behaves exactly like the built-in setup.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one zonebrew deployment.
///
/// Load with `ServiceConfig::load()` which searches:
/// 1. `$ZONEBREW_CONFIG` env var
/// 2. `./zonebrew.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Search defaults and limits
    #[serde(default)]
    pub solver: SolverConfig,

    /// Catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl ServiceConfig {
    /// Load configuration using the standard search order:
    /// 1. `$ZONEBREW_CONFIG` environment variable
    /// 2. `./zonebrew.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded service config from ZONEBREW_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from ZONEBREW_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "ZONEBREW_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./zonebrew.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded service config from ./zonebrew.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./zonebrew.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No zonebrew.toml found, using built-in defaults");
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
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Service config saved");
        Ok(())
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - `server.addr` must be a socket address
    /// - Caps and `default_top_k` must be positive, `default_top_k <= max_top_k`
    /// - Default caps must not exceed `max_total_cap` / `max_per_cap`
    /// - The attribute domain must be finite with `domain_min < domain_max`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.server.addr.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "server.addr: '{}' is not a valid socket address",
                self.server.addr
            ));
        }

        let s = &self.solver;
        if s.default_total_cap == 0 {
            errors.push("solver.default_total_cap must be > 0".to_string());
        }
        if s.default_per_cap == 0 {
            errors.push("solver.default_per_cap must be > 0".to_string());
        }
        if s.default_total_cap > s.max_total_cap {
            errors.push(format!(
                "solver.default_total_cap ({}) must be <= solver.max_total_cap ({})",
                s.default_total_cap, s.max_total_cap
            ));
        }
        if s.default_per_cap > s.max_per_cap {
            errors.push(format!(
                "solver.default_per_cap ({}) must be <= solver.max_per_cap ({})",
                s.default_per_cap, s.max_per_cap
            ));
        }
        if s.default_top_k == 0 {
            errors.push("solver.default_top_k must be > 0".to_string());
        }
        if s.default_top_k > s.max_top_k {
            errors.push(format!(
                "solver.default_top_k ({}) must be <= solver.max_top_k ({})",
                s.default_top_k, s.max_top_k
            ));
        }
        if !s.domain_min.is_finite() || !s.domain_max.is_finite() {
            errors.push("solver.domain_min and solver.domain_max must be finite".to_string());
        } else if s.domain_min >= s.domain_max {
            errors.push(format!(
                "solver.domain_min ({:.3}) must be < solver.domain_max ({:.3})",
                s.domain_min, s.domain_max
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
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
    /// Can be overridden by the `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::DEFAULT_SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Defaults applied to requests that leave a field blank, plus search limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_total_cap")]
    pub default_total_cap: u32,

    #[serde(default = "default_per_cap")]
    pub default_per_cap: u32,

    /// Caller-supplied total caps are clamped to this
    #[serde(default = "default_max_total_cap")]
    pub max_total_cap: u32,

    /// Caller-supplied per-ingredient caps are clamped to this
    #[serde(default = "default_max_per_cap")]
    pub max_per_cap: u32,

    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Requests asking for more are clamped to this
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Node budget per search; 0 disables it
    #[serde(default = "default_max_state_visits")]
    pub max_state_visits: u64,

    /// Wall-clock budget per search in milliseconds; 0 disables it
    #[serde(default)]
    pub time_budget_ms: u64,

    /// Run independent interval boxes on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Retry with fewer optional ingredients when the budget runs out empty-handed
    #[serde(default = "default_true")]
    pub optional_trim: bool,

    /// Legal attribute domain that request bounds are clamped into
    #[serde(default = "default_domain_min")]
    pub domain_min: f64,

    #[serde(default = "default_domain_max")]
    pub domain_max: f64,
}

fn default_total_cap() -> u32 { defaults::DEFAULT_TOTAL_CAP }
fn default_per_cap() -> u32 { defaults::DEFAULT_PER_CAP }
fn default_max_total_cap() -> u32 { defaults::MAX_TOTAL_CAP }
fn default_max_per_cap() -> u32 { defaults::MAX_PER_CAP }
fn default_top_k() -> usize { defaults::DEFAULT_TOP_K }
fn default_max_top_k() -> usize { defaults::MAX_TOP_K }
fn default_max_state_visits() -> u64 { defaults::DEFAULT_MAX_STATE_VISITS }
fn default_true() -> bool { true }
fn default_domain_min() -> f64 { defaults::DOMAIN_MIN }
fn default_domain_max() -> f64 { defaults::DOMAIN_MAX }

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            default_total_cap: default_total_cap(),
            default_per_cap: default_per_cap(),
            max_total_cap: default_max_total_cap(),
            max_per_cap: default_max_per_cap(),
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            max_state_visits: default_max_state_visits(),
            time_budget_ms: 0,
            parallel: true,
            optional_trim: true,
            domain_min: default_domain_min(),
            domain_max: default_domain_max(),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in catalog is used when unset.
    ///
    /// `$ZONEBREW_CATALOG` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// ============================================================================
// Tests
// ============================================================================
