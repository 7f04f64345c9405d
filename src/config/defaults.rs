//! System-wide default constants.
//!
//! Grouped by subsystem. Config structs use these for their `Default` impls.

// ============================================================================
// Config Files
// ============================================================================

/// Environment variable naming the service config file.
pub const CONFIG_ENV_VAR: &str = "ZONEBREW_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "zonebrew.toml";

// ============================================================================
// Server
// ============================================================================

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// Largest accepted request body (bytes).
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

// ============================================================================
// Solver
// ============================================================================

/// Total-quantity cap used when a request leaves it blank.
pub const DEFAULT_TOTAL_CAP: u32 = 25;

/// Per-ingredient cap used when a request leaves it blank.
pub const DEFAULT_PER_CAP: u32 = 25;

/// Largest total cap accepted from callers; bigger requests are clamped.
pub const MAX_TOTAL_CAP: u32 = 200;

/// Largest per-ingredient cap accepted from callers.
pub const MAX_PER_CAP: u32 = 200;

/// Solutions returned when a request does not ask for a number.
pub const DEFAULT_TOP_K: usize = 10;

/// Hard ceiling on `top_k` accepted from callers.
pub const MAX_TOP_K: usize = 100;

/// Node budget per search (visited DFS nodes across all boxes).
pub const DEFAULT_MAX_STATE_VISITS: u64 = 1_000_000;

/// Lower bound of the legal attribute domain.
pub const DOMAIN_MIN: f64 = 0.0;

/// Upper bound of the legal attribute domain.
pub const DOMAIN_MAX: f64 = 11.0;
