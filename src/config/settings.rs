//! Process settings.
//!
//! Settings describe how the gateway process runs (listener, secret
//! protection, observability). They are read once at startup from an
//! optional TOML file; the configuration document itself is reloaded
//! separately by the watcher.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root settings for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Path of the JSON configuration document.
    pub config_path: PathBuf,

    /// Enforce per-configuration secrets on signing requests.
    pub secret_enabled: bool,

    /// Prefix recorded in proofs in front of the called operation path.
    pub context_path: String,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("conf/gateway-conf.json"),
            secret_enabled: true,
            context_path: String::new(),
            listener: ListenerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes (documents are uploaded whole).
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 60,
            max_body_size: 50 * 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

impl GatewaySettings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings: GatewaySettings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.listener.request_timeout_secs == 0 {
            return Err(SettingsError::Invalid("listener.request_timeout_secs must be > 0".into()));
        }
        if self.listener.max_body_size == 0 {
            return Err(SettingsError::Invalid("listener.max_body_size must be > 0".into()));
        }
        if !self.context_path.is_empty() && !self.context_path.starts_with('/') {
            return Err(SettingsError::Invalid("context_path must start with '/'".into()));
        }
        Ok(())
    }
}
