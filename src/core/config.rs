use crate::models::settings::RetentionSettings;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub deluge: DelugeConfig,
    #[serde(default)]
    pub retention: RetentionSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelugeConfig {
    pub host: String,
    #[serde(default = "default_deluge_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    pub password: String,
    #[serde(default = "default_remove_data")]
    pub remove_data: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Append JSON log lines to this file instead of stdout
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            path: None,
            console: default_console(),
        }
    }
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("seedsweep-settings.json")
}

fn default_deluge_port() -> u16 {
    8112
}

fn default_username() -> String {
    "localclient".to_string()
}

fn default_remove_data() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl DelugeConfig {
    /// Base URL of the Web UI, e.g. `http://127.0.0.1:8112`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        // Validate deluge config
        if self.deluge.host.is_empty() {
            bail!("deluge host must not be empty");
        }

        if self.deluge.port == 0 {
            bail!("deluge port must be greater than 0");
        }

        if self.deluge.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        // Validate retention rules
        self.retention.validate()?;

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
