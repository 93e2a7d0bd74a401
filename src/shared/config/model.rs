use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::endpoint::{Endpoint, EndpointRegistry, RegistryError};
use crate::fanout::ExecutionMode;

pub const DEFAULT_PORT: u16 = 6557;
pub const CONFIG_ENV: &str = "LIVESTATUS_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Per-endpoint budget for connect, send and receive, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    3_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Display name; defaults to the host
    pub name: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl EndpointConfig {
    pub fn to_endpoint(&self) -> Endpoint {
        let endpoint = Endpoint::new(self.host.clone(), self.port);
        match &self.name {
            Some(name) => endpoint.with_name(name.clone()),
            None => endpoint,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Daily-rotated log files are written here when set
    pub log_dir: Option<String>,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            stdout_level: default_stdout_level(),
            file_level: default_file_level(),
        }
    }
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.client.timeout_ms)
    }

    /// Registry holding every configured endpoint, in file order.
    pub fn registry(&self) -> Result<EndpointRegistry, RegistryError> {
        EndpointRegistry::try_from(
            self.endpoints
                .iter()
                .map(EndpointConfig::to_endpoint)
                .collect::<Vec<_>>(),
        )
    }
}

/// Loads settings from the file named by `LIVESTATUS_CONFIG` (default `config`,
/// any extension the `config` crate understands).
pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var(CONFIG_ENV).unwrap_or_else(|_| "config".to_string());

    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(&config_path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}

pub fn load_settings_from(path: &Path) -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .build()?
        .try_deserialize()
}
