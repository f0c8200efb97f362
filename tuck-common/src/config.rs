//! Configuration loading for the report checker client
//!
//! Settings resolve in the following priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Analysis endpoint of the locally running service
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/analyze-batch";
/// Number of pages the service is asked to analyze
pub const DEFAULT_MAX_PAGES: u32 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_PROGRESS_TICK_MS: u64 = 1000;
pub const DEFAULT_PROGRESS_RESET_MS: u64 = 2000;

pub const ENV_ENDPOINT: &str = "TUCK_ENDPOINT";
pub const ENV_MAX_PAGES: &str = "TUCK_MAX_PAGES";
pub const ENV_TIMEOUT_SECS: &str = "TUCK_TIMEOUT_SECS";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the analysis endpoint
    pub endpoint: String,

    /// Page limit sent as the `max_pages` query parameter
    pub max_pages: u32,

    /// Request timeout in seconds (0 disables the timeout)
    pub request_timeout_secs: u64,

    /// Progress estimator cadence
    pub progress_tick_ms: u64,

    /// Delay before the progress bar resets after a submit settles
    pub progress_reset_ms: u64,

    pub logging: LoggingConfig,
}

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is not set
    pub level: String,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub max_pages: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            progress_tick_ms: DEFAULT_PROGRESS_TICK_MS,
            progress_reset_ms: DEFAULT_PROGRESS_RESET_MS,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Resolve configuration from all tiers
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        // Priority 3/4: TOML file on top of compiled defaults
        let mut config = match &overrides.config_path {
            Some(path) => Self::from_toml_file(path)?,
            None => match default_config_path() {
                Some(path) => Self::from_toml_file(&path)?,
                None => {
                    debug!("No config file found, using compiled defaults");
                    Self::default()
                }
            },
        };

        // Priority 2: Environment variables
        config.apply_env()?;

        // Priority 1: Command-line arguments
        config.apply_overrides(overrides);

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text, missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            debug!("Endpoint taken from {}", ENV_ENDPOINT);
            self.endpoint = endpoint;
        }
        if let Some(max_pages) = parse_env::<u32>(ENV_MAX_PAGES)? {
            self.max_pages = max_pages;
        }
        if let Some(timeout) = parse_env::<u64>(ENV_TIMEOUT_SECS)? {
            self.request_timeout_secs = timeout;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(endpoint) = &overrides.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(max_pages) = overrides.max_pages {
            self.max_pages = max_pages;
        }
        if let Some(timeout) = overrides.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    /// Reject values the client cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("endpoint must not be empty".to_string()));
        }
        if self.max_pages == 0 {
            return Err(Error::Config("max_pages must be at least 1".to_string()));
        }
        if self.progress_tick_ms == 0 {
            return Err(Error::Config(
                "progress_tick_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    pub fn progress_reset_delay(&self) -> Duration {
        Duration::from_millis(self.progress_reset_ms)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

/// Platform config file (`~/.config/tuck/config.toml` on Linux), if present
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("tuck").join("config.toml"))
        .filter(|path| path.exists())
}
