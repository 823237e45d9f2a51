//! Configuration module for the pingmon application.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Probe targets (comma-separated host list)
//! - Refresh interval (minimum seconds between probe rounds)
//! - Per-host probe timeout

mod app;
mod hosts;
mod validation;

pub use app::AppConfig;
pub use hosts::{HostAddress, HostAddressError, parse_host_list};
pub use validation::ConfigError;

// Re-export constants
pub use app::{DEFAULT_PROBE_TIMEOUT, DEFAULT_REFRESH_INTERVAL};
