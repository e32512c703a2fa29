//! TOML configuration for the relay server.
//!
//! Read from `$AIRMOUSE_CONFIG` when set, otherwise from the platform config
//! directory:
//! - Windows:  `%APPDATA%\AirMouse\config.toml`
//! - Linux:    `~/.config/airmouse/config.toml`
//! - macOS:    `~/Library/Application Support/AirMouse/config.toml`
//!
//! ```toml
//! [network]
//! bind_address = "0.0.0.0"
//! command_port = 5000
//! discovery_port = 5001
//! recv_timeout_ms = 1000
//!
//! [motion]
//! default_scale = 1.6667
//! smoothing = false
//!
//! [injection]
//! backend = "platform"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every section and field is optional.  `#[serde(default = "fn")]` fills in
//! whatever the file leaves out.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use airmouse_core::protocol::{DEFAULT_COMMAND_PORT, DEFAULT_DISCOVERY_PORT};
use airmouse_core::MotionConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted `[motion] scroll_step`: one hundred 120-unit notches.
pub const MAX_SCROLL_STEP: i32 = 12_000;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "AIRMOUSE_CONFIG";

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No explicit path was given and the platform config directory is unknown.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `bind_address` is not an IP address.
    #[error("invalid bind address {0:?}")]
    InvalidAddress(String),

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub injection: InjectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Socket settings for both UDP endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address both sockets bind to.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// UDP port for command datagrams.
    #[serde(default = "default_command_port")]
    pub command_port: u16,
    /// UDP port for discovery probes.
    #[serde(default = "default_discovery_port")]
    pub discovery_port: u16,
    /// Receive timeout; bounds how long shutdown takes to be noticed.
    #[serde(default = "default_recv_timeout_ms")]
    pub recv_timeout_ms: u64,
}

/// Which [`InputInjector`](crate::application::dispatch_command::InputInjector)
/// the server drives.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The OS backend compiled for this platform.
    #[default]
    Platform,
    /// Log and record events without touching real input.
    Recording,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InjectionConfig {
    #[serde(default)]
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset, e.g. `"info"` or
    /// `"airmouse_server=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_command_port() -> u16 {
    DEFAULT_COMMAND_PORT
}
fn default_discovery_port() -> u16 {
    DEFAULT_DISCOVERY_PORT
}
fn default_recv_timeout_ms() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            command_port: default_command_port(),
            discovery_port: default_discovery_port(),
            recv_timeout_ms: default_recv_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl NetworkConfig {
    fn bind_ip(&self) -> Result<IpAddr, ConfigError> {
        self.bind_address
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.bind_address.clone()))
    }

    /// Address of the command endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `bind_address` does not parse.
    pub fn command_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.command_port))
    }

    /// Address of the discovery endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `bind_address` does not parse.
    pub fn discovery_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.discovery_port))
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }
}

impl ServerConfig {
    /// Checks cross-field and range constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] for an unparsable bind address
    /// and [`ConfigError::Invalid`] for everything else.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let net = &self.network;
        net.bind_ip()?;

        // Port 0 on both sides lets the OS pick two distinct ports.
        if net.command_port == net.discovery_port && net.command_port != 0 {
            return Err(ConfigError::Invalid(format!(
                "command_port and discovery_port are both {}",
                net.command_port
            )));
        }
        if net.recv_timeout_ms == 0 {
            return Err(ConfigError::Invalid("recv_timeout_ms must be at least 1".into()));
        }

        let motion = &self.motion;
        if !(motion.default_scale.is_finite() && motion.default_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default_scale must be positive, got {}",
                motion.default_scale
            )));
        }
        if !(motion.dead_zone.is_finite() && motion.dead_zone >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "dead_zone must be a non-negative number, got {}",
                motion.dead_zone
            )));
        }
        if motion.history_len == 0 {
            return Err(ConfigError::Invalid("history_len must be at least 1".into()));
        }
        if !(1..=MAX_SCROLL_STEP).contains(&motion.scroll_step) {
            return Err(ConfigError::Invalid(format!(
                "scroll_step must be between 1 and {MAX_SCROLL_STEP}, got {}",
                motion.scroll_step
            )));
        }
        Ok(())
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Resolves the config file path: `$AIRMOUSE_CONFIG`, else the platform dir.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if neither is available.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads and validates the config from [`config_file_path`].
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads and validates the config at `path`, returning
/// `ServerConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] for malformed TOML, and a validation error for
/// out-of-range values.
pub fn load_config_from(path: &Path) -> Result<ServerConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<ServerConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ServerConfig::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("AirMouse"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("airmouse"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("AirMouse"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
