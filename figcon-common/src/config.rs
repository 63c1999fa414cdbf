//! Console configuration loading and server endpoint resolution

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{Error, Result};

/// Environment variable overriding the media-server base URL
pub const SERVER_URL_ENV: &str = "FIGCON_SERVER_URL";

/// Compiled default media-server base URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5280";

/// Compiled default request timeout for remote calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Compiled default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "figcon=info";

/// Optional values read from the TOML config file
///
/// Every field is optional; anything absent falls back to the compiled
/// defaults. A missing or malformed file degrades to defaults with a
/// warning and never aborts startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub server_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_filter: Option<String>,
}

impl TomlConfig {
    /// Parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Resolved console configuration
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the media server's REST API
    pub server_url: String,
    /// Timeout applied by the HTTP transport (the settings engine itself
    /// enforces none)
    pub request_timeout_secs: u64,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Resolve configuration following the priority order:
    /// 1. Explicit argument (highest priority)
    /// 2. Environment variable
    /// 3. TOML config file
    /// 4. Compiled default (fallback)
    ///
    /// Only the server URL participates in steps 1 and 2; timeout and log
    /// filter come from the file or the defaults.
    pub fn resolve(cli_server_url: Option<&str>) -> Self {
        Self::resolve_with(cli_server_url, default_config_path().as_deref())
    }

    /// As [`resolve`](Self::resolve), with an explicit config file path.
    pub fn resolve_with(cli_server_url: Option<&str>, config_path: Option<&Path>) -> Self {
        let file = match config_path {
            Some(path) if path.exists() => match TomlConfig::load(path) {
                Ok(file) => file,
                Err(e) => {
                    warn!("Ignoring unreadable config file: {}", e);
                    TomlConfig::default()
                }
            },
            _ => TomlConfig::default(),
        };

        let server_url = cli_server_url
            .map(str::to_string)
            .or_else(|| std::env::var(SERVER_URL_ENV).ok())
            .or(file.server_url)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        Self {
            server_url,
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_filter: file
                .log_filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

/// Per-platform default config file path: `<config_dir>/figcon/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("figcon").join("config.toml"))
}
