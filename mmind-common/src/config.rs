//! Configuration loading and resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument / environment variable (collected by the binary)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! A missing TOML file is not an error; a malformed one is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default HTTP port for the transcription relay
pub const DEFAULT_PORT: u16 = 5780;

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default base URL of the transcription service
pub const DEFAULT_TRANSCRIPTION_URL: &str = "http://localhost:8000";

/// Default bound on a single delegated transcription call
pub const DEFAULT_TRANSCRIPTION_TIMEOUT_SECS: u64 = 600;

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional so that partial files are accepted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TomlConfig {
    /// Path to SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Bind address (e.g. "127.0.0.1" or "0.0.0.0")
    #[serde(default)]
    pub bind: Option<String>,

    /// Transcription service settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[transcription]` table
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TranscriptionConfig {
    /// Base URL of the transcription service
    #[serde(default)]
    pub service_url: Option<String>,

    /// Timeout for one transcription call, in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// OS-dependent compiled defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub log_level: String,
}

impl CompiledDefaults {
    /// Defaults for the platform we are running on
    pub fn for_current_platform() -> Self {
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join("meetingmind"))
            .unwrap_or_else(|| PathBuf::from("./meetingmind_data"));

        Self {
            database_path: data_dir.join("meetingmind.db"),
            config_path: dirs::config_dir().map(|d| d.join("meetingmind").join("mmind-tr.toml")),
            log_level: "info".to_string(),
        }
    }
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub database_path: Option<PathBuf>,
    pub transcription_url: Option<String>,
    pub transcription_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub port: u16,
    pub bind: String,
    pub database_path: PathBuf,
    pub transcription_url: String,
    pub transcription_timeout: Duration,
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge overrides, TOML and defaults, then validate
    pub fn resolve(
        overrides: ConfigOverrides,
        toml: Option<TomlConfig>,
        defaults: &CompiledDefaults,
    ) -> Result<Self> {
        let toml = toml.unwrap_or_default();

        let timeout_secs = overrides
            .transcription_timeout_secs
            .or(toml.transcription.timeout_secs)
            .unwrap_or(DEFAULT_TRANSCRIPTION_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config(
                "transcription timeout must be greater than zero".to_string(),
            ));
        }

        let transcription_url = overrides
            .transcription_url
            .or(toml.transcription.service_url)
            .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_URL.to_string());
        let transcription_url = transcription_url.trim().trim_end_matches('/').to_string();
        if transcription_url.is_empty() {
            return Err(Error::Config("transcription service URL is empty".to_string()));
        }

        Ok(Self {
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            bind: overrides
                .bind
                .or(toml.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            database_path: overrides
                .database_path
                .or(toml.database_path)
                .unwrap_or_else(|| defaults.database_path.clone()),
            transcription_url,
            transcription_timeout: Duration::from_secs(timeout_secs),
            log_level: overrides
                .log_level
                .or(toml.logging.level)
                .unwrap_or_else(|| defaults.log_level.clone()),
        })
    }
}

/// Load TOML config from `path`
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    Ok(Some(config))
}
