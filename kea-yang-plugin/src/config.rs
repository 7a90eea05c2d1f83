use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Plugin settings that used to be process-wide constants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Absolute path of the YANG model root all reads are rooted at.
    pub model_root: String,
    pub control_channel: ControlChannelConfig,
    pub delivery: DeliveryConfig,
}

/// Where the Kea control socket lives and how long to wait on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlChannelConfig {
    pub socket_path: PathBuf,
    pub timeout_secs: u64,
}

/// How a rendered document reaches the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeliveryConfig {
    pub mode: DeliveryMode,
    pub client_binary: PathBuf,
    pub temp_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Write a temp file and run the external control-channel client.
    Client,
    /// Send `config-set` over the control socket directly.
    Socket,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            model_root: "/ietf-kea-dhcpv6:server".to_string(),
            control_channel: ControlChannelConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl Default for ControlChannelConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/tmp/kea-control-channel"),
            timeout_secs: 5,
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::Client,
            client_binary: PathBuf::from("ctrl-client-cli"),
            temp_file: PathBuf::from("/tmp/kea-plugin-gen-cfg.json"),
        }
    }
}

impl ControlChannelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Errors returned when loading plugin configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config in {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// Load plugin configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PluginConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_config(&raw, path.display().to_string())
}

const EMBEDDED_DEFAULTS: &str = "embedded defaults";

/// Built-in configuration shipped with the crate.
///
/// A broken `defaults/plugin.toml` is reported, never replaced by the
/// compiled-in values.
pub fn default_config() -> Result<PluginConfig, ConfigError> {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/defaults/plugin.toml"));
    parse_config(embedded, EMBEDDED_DEFAULTS.to_string())
}

/// Load `path` when given, the embedded defaults otherwise.
pub fn resolve_config(path: Option<&Path>) -> Result<PluginConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => default_config(),
    }
}

fn parse_config(raw: &str, path: String) -> Result<PluginConfig, ConfigError> {
    let parsed: PluginConfig = toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    validate(&parsed).map_err(|reason| ConfigError::Invalid { path, reason })?;
    Ok(parsed)
}

/// Check the values a TOML file or CLI override may get wrong.
pub fn validate(config: &PluginConfig) -> Result<(), String> {
    let root = &config.model_root;
    if !root.starts_with('/') || root.len() < 2 {
        return Err(format!("model_root '{root}' must be an absolute path"));
    }
    if root.ends_with('/') {
        return Err(format!("model_root '{root}' must not end with '/'"));
    }
    if config.control_channel.timeout_secs == 0 {
        return Err("control_channel.timeout_secs must be greater than zero".to_string());
    }
    Ok(())
}
