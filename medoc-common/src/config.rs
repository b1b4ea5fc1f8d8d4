//! Configuration loading and root folder resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment handling live in the binaries (clap `env`);
//! this module owns the TOML layer and the compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MEDOC_ROOT_FOLDER";

/// Default error log size threshold before rotation (1 MiB)
pub const DEFAULT_ERROR_LOG_MAX_BYTES: u64 = 1_048_576;

/// Bootstrap configuration loaded from TOML file
///
/// Every section is optional. A missing file is not an error; the caller
/// gets defaults and a warning.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Working folder for the error log and default store location
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Document store connection triple
    #[serde(default)]
    pub store: StoreConfig,

    /// Metadata provider selection
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Error log location and rotation threshold
    #[serde(default)]
    pub error_log: ErrorLogConfig,

    /// Worker pool size (defaults to host parallelism)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Document store section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Store endpoint URI
    pub endpoint: Option<String>,
    /// Namespace (database) name
    pub namespace: Option<String>,
    /// Collection name
    pub collection: Option<String>,
}

/// Metadata provider section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL of an HTTP metadata service
    pub base_url: Option<String>,
    /// Directory holding one JSON file per title
    pub dir: Option<PathBuf>,
    /// Request rate limit for the HTTP provider
    pub requests_per_second: Option<u32>,
}

/// Error log section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ErrorLogConfig {
    /// Directory holding `errors.txt` and its backup
    pub dir: Option<PathBuf>,
    /// Rotation threshold in bytes
    pub max_bytes: Option<u64>,
}

impl ErrorLogConfig {
    /// Rotation threshold, falling back to 1 MiB
    pub fn max_bytes_or_default(&self) -> u64 {
        self.max_bytes.unwrap_or(DEFAULT_ERROR_LOG_MAX_BYTES)
    }
}

/// Per-user config file location (`~/.config/medoc/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("medoc").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Load configuration from an explicit path or the per-user default
///
/// An explicit path must exist. The default location may be absent, in which
/// case compiled defaults are returned.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)?;
        info!("Loaded configuration from {}", path.display());
        return Ok(config);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        _ => {
            warn!("No configuration file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Write configuration to a TOML file, creating parent directories
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Resolve the working root folder
///
/// Priority: CLI argument, `MEDOC_ROOT_FOLDER`, TOML `root_folder`, compiled default.
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    get_default_root_folder()
}

/// OS-dependent default root folder
pub fn get_default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("medoc"))
        .unwrap_or_else(|| PathBuf::from("./medoc_data"))
}
