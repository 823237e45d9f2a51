//! Application configuration structures.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::hosts::{HostAddress, parse_host_list};
use super::validation::ConfigError;

/// Default refresh interval between probe rounds (10 seconds).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Default per-host probe timeout (1 second).
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Default probe targets.
const DEFAULT_SERVERS: &str = "1.1.1.1,4.2.2.2,9.9.9.9";

fn default_servers() -> String {
    DEFAULT_SERVERS.to_string()
}

fn default_refresh_interval() -> f64 {
    DEFAULT_REFRESH_INTERVAL.as_secs_f64()
}

fn default_timeout() -> Duration {
    DEFAULT_PROBE_TIMEOUT
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Comma-separated list of probe targets (IP literals or DNS names).
    pub servers: String,

    /// Minimum seconds between probe rounds (default: 10).
    pub refresh_interval: f64,

    /// Per-host probe timeout (default: 1s).
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            refresh_interval: default_refresh_interval(),
            timeout: default_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    /// or unusable.
    ///
    /// A missing file is created with default contents so it can be edited
    /// for the next run. Read/parse/validation failures are logged and the
    /// defaults are used; a broken config never prevents startup.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.write_to(path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to write default config file");
            } else {
                tracing::info!(path = %path.display(), "Created default config file");
            }
            return config;
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Write this configuration to a YAML file, creating parent directories.
    ///
    /// # Errors
    /// Returns `ConfigError` on serialization or I/O failure.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "probe timeout must be non-zero".to_string(),
            ));
        }
        if !self.refresh_interval.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "refresh_interval must be finite, got {}",
                self.refresh_interval
            )));
        }
        Ok(())
    }

    /// Derive the ordered probe target list from the `servers` string.
    pub fn hosts(&self) -> Vec<HostAddress> {
        parse_host_list(&self.servers)
    }

    /// Refresh interval as a duration, substituting the default for
    /// non-positive or unrepresentable values.
    pub fn effective_refresh_interval(&self) -> Duration {
        match Duration::try_from_secs_f64(self.refresh_interval) {
            Ok(interval) if !interval.is_zero() => interval,
            _ => {
                tracing::warn!(
                    refresh_interval = self.refresh_interval,
                    default_secs = DEFAULT_REFRESH_INTERVAL.as_secs(),
                    "Unusable refresh interval, using default"
                );
                DEFAULT_REFRESH_INTERVAL
            }
        }
    }

    /// Set the servers string.
    pub fn with_servers(mut self, servers: impl Into<String>) -> Self {
        self.servers = servers.into();
        self
    }

    /// Set the refresh interval in seconds.
    pub fn with_refresh_interval(mut self, seconds: f64) -> Self {
        self.refresh_interval = seconds;
        self
    }

    /// Set the probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
