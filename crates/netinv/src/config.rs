//! Configuration loading and types

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::WrapErr;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the netinv daemon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Diagnostic tool settings
    #[serde(default)]
    pub probe: ProbeConfig,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address and port to bind to
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
        }
    }
}

/// Diagnostic tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Upper bound for a single `ip` / `ethtool` run, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `ip` binary
    #[serde(default = "default_ip_command")]
    pub ip_command: String,
    /// `ethtool` binary
    #[serde(default = "default_ethtool_command")]
    pub ethtool_command: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            ip_command: default_ip_command(),
            ethtool_command: default_ethtool_command(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_ip_command() -> String {
    "ip".to_string()
}

fn default_ethtool_command() -> String {
    "ethtool".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load from `NETINV_CONFIG`, the default paths, or fall back to defaults
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_default() -> eyre::Result<Self> {
        if let Ok(path) = std::env::var("NETINV_CONFIG") {
            return Self::load(&PathBuf::from(path));
        }

        let paths = [
            Some(PathBuf::from("netinv.toml")),
            Some(PathBuf::from("/etc/netinv/netinv.toml")),
            dirs::config_dir().map(|p| p.join("netinv/netinv.toml")),
        ];

        for path in paths.into_iter().flatten() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Config::default())
    }

    /// Apply `PORT` and `NETINV_BIND` from the process environment
    ///
    /// # Errors
    /// Returns error if `PORT` is not a valid port
    pub fn apply_env(self) -> eyre::Result<Self> {
        let bind = std::env::var("NETINV_BIND").ok();
        let port = std::env::var("PORT").ok();
        self.with_overrides(bind.as_deref(), port.as_deref())
    }

    /// Replace the bind address, then the port
    ///
    /// `port` accepts both `8080` and the `:8080` listen-address form.
    ///
    /// # Errors
    /// Returns error if `port` is not a valid port
    pub fn with_overrides(mut self, bind: Option<&str>, port: Option<&str>) -> eyre::Result<Self> {
        if let Some(bind) = bind.filter(|b| !b.is_empty()) {
            self.server.bind = bind.to_string();
        }

        if let Some(port) = port.filter(|p| !p.is_empty()) {
            let port: u16 = port
                .trim_start_matches(':')
                .parse()
                .wrap_err_with(|| format!("invalid PORT {port:?}"))?;
            let host = self
                .server
                .bind
                .rsplit_once(':')
                .map_or(self.server.bind.as_str(), |(host, _)| host);
            self.server.bind = format!("{host}:{port}");
        }

        Ok(self)
    }

    /// Parsed bind address
    ///
    /// # Errors
    /// Returns error if `server.bind` is not a socket address
    pub fn bind_addr(&self) -> eyre::Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .wrap_err_with(|| format!("invalid bind address {:?}", self.server.bind))
    }

    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_secs)
    }
}
