use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::session::notifier::NotificationPermission;

/// Longest membership validity accepted, ten years
pub const MAX_VALIDITY_DAYS: u32 = 3650;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub membership: MembershipConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub unix_socket: Option<PathBuf>,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MembershipConfig {
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: u32,
    /// Style label that unlocks every class
    #[serde(default = "default_all_styles_label")]
    pub all_styles_label: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NotificationConfig {
    #[serde(default)]
    pub permission: NotificationPermission,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_storage_backend() -> String {
    "file".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("studio-storage.json")
}

fn default_validity_days() -> u32 {
    30
}

fn default_expiry_warning_days() -> u32 {
    3
}

fn default_all_styles_label() -> String {
    "All styles".to_string()
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

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: default_storage_path(),
        }
    }
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            validity_days: default_validity_days(),
            expiry_warning_days: default_expiry_warning_days(),
            all_styles_label: default_all_styles_label(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port.is_none() && self.server.unix_socket.is_none() {
            bail!("Either port or unix_socket must be specified in server config");
        }

        if let Some(port) = self.server.port {
            if port == 0 {
                bail!("Server port must be greater than 0");
            }
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        let valid_backends = ["memory", "file"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            bail!(
                "Invalid storage backend '{}'. Must be one of: memory, file",
                self.storage.backend
            );
        }

        if self.storage.backend == "file" && self.storage.path.as_os_str().is_empty() {
            bail!("storage path must not be empty for the file backend");
        }

        if self.membership.validity_days == 0 {
            bail!("validity_days must be greater than 0");
        }

        if self.membership.validity_days > MAX_VALIDITY_DAYS {
            bail!(
                "validity_days ({}) must not exceed {}",
                self.membership.validity_days,
                MAX_VALIDITY_DAYS
            );
        }

        if self.membership.expiry_warning_days >= self.membership.validity_days {
            bail!(
                "expiry_warning_days ({}) must be less than validity_days ({})",
                self.membership.expiry_warning_days,
                self.membership.validity_days
            );
        }

        if self.membership.all_styles_label.trim().is_empty() {
            bail!("all_styles_label must not be empty");
        }

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
