//! Service configuration
//!
//! Loaded from a JSON file. Optional fields fall back to defaults; the
//! result is validated before use.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;

/// Configuration load failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Upstream form platform credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// API base URL, with trailing slash
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: String,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Id of the mirrored form (required)
    pub form_id: String,

    /// Upstream API used for seeding
    #[serde(default)]
    pub upstream: Option<UpstreamConfig>,

    /// Local JSON export used for seeding instead of `upstream`
    #[serde(default)]
    pub seed_file: Option<PathBuf>,

    /// Deadline for each store call in milliseconds (default: 10000)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Log level directive (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_query_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Creates a config with defaults for everything but the form id
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            form_id: form_id.into(),
            upstream: None,
            seed_file: None,
            query_timeout_ms: default_query_timeout_ms(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.form_id.trim().is_empty() {
            return Err(ConfigError::Invalid("form_id must not be empty".into()));
        }

        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid("query_timeout_ms must be > 0".into()));
        }

        if let Some(upstream) = &self.upstream {
            if !upstream.base_url.ends_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "upstream.base_url must end with '/': '{}'",
                    upstream.base_url
                )));
            }
            if upstream.api_key.is_empty() {
                return Err(ConfigError::Invalid(
                    "upstream.api_key must not be empty".into(),
                ));
            }
        }

        Ok(())
    }

    /// Per-call store deadline
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// HTTP listener settings
    pub fn http(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}
