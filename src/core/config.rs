//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.cyra/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CyraConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub backend_url: Option<String>,
    pub status_poll_secs: Option<u64>,
    pub report_tip_delay_ms: Option<u64>,
    pub notification_ttl_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub backend_url: Option<String>,
    pub log_file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_STATUS_POLL_SECS: u64 = 30;
pub const DEFAULT_REPORT_TIP_DELAY_MS: u64 = 2000;
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 4000;
pub const DEFAULT_LOG_FILE: &str = "cyra.log";

pub const BACKEND_URL_ENV: &str = "CYRA_BACKEND_URL";
pub const LOG_FILE_ENV: &str = "CYRA_LOG_FILE";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Backend root; may be empty, in which case every request fails.
    pub backend_url: String,
    pub status_poll_interval: Duration,
    pub report_tip_delay: Duration,
    pub notification_ttl: Duration,
    pub log_file: String,
    pub log_level: LevelFilter,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.cyra/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cyra").join("config.toml"))
}

/// Load config from `~/.cyra/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CyraConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<CyraConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(CyraConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<CyraConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(CyraConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: CyraConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# CyRA Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# backend_url = "http://localhost:8001"   # Or set CYRA_BACKEND_URL, or --backend-url
# status_poll_secs = 30                   # Liveness probe cadence
# report_tip_delay_ms = 2000              # Delay before the report suggestion
# notification_ttl_ms = 4000              # How long a notification stays up

# [logging]
# file = "cyra.log"                       # Or set CYRA_LOG_FILE, or --log-file
# level = "debug"                         # "error", "warn", "info", "debug", "trace", "off"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &CyraConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &CyraConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Backend URL: CLI → env → config → empty
    let backend_url = cli
        .backend_url
        .clone()
        .or_else(|| env(BACKEND_URL_ENV))
        .or_else(|| config.general.backend_url.clone())
        .unwrap_or_default();
    if backend_url.is_empty() {
        warn!("No backend URL configured; requests will fail until one is set");
    }

    // Log file: CLI → env → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env(LOG_FILE_ENV))
        .or_else(|| config.logging.file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    ResolvedConfig {
        backend_url,
        status_poll_interval: Duration::from_secs(
            config
                .general
                .status_poll_secs
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_STATUS_POLL_SECS),
        ),
        report_tip_delay: Duration::from_millis(
            config
                .general
                .report_tip_delay_ms
                .unwrap_or(DEFAULT_REPORT_TIP_DELAY_MS),
        ),
        notification_ttl: Duration::from_millis(
            config
                .general
                .notification_ttl_ms
                .unwrap_or(DEFAULT_NOTIFICATION_TTL_MS),
        ),
        log_file,
        log_level: parse_level(config.logging.level.as_deref()),
    }
}

/// Unknown or missing level names fall back to `Debug`.
fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.map(str::to_ascii_lowercase).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Debug,
    }
}
