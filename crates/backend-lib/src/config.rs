// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "gatehouse.toml";

/// Prefix of environment overrides, e.g. `GATEHOUSE_SESSION__TIMEOUT_SECS`
pub const ENV_PREFIX: &str = "GATEHOUSE_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// How clients authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// HTTP Basic-Auth on every request
    #[default]
    Basic,
    /// Login form backed by a session cookie
    Form,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Basic => f.write_str("basic"),
            AuthMode::Form => f.write_str("form"),
        }
    }
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(AuthMode::Basic),
            "form" => Ok(AuthMode::Form),
            other => bail!("unknown auth mode: {other}"),
        }
    }
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind; empty means all interfaces
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 8000,
        }
    }
}

/// Session store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Name of the cookie carrying the session token
    pub cookie_name: String,
    /// Fixed lifetime of a session, counted from creation
    pub timeout_secs: u64,
    /// Period of the background sweep
    pub gc_interval_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "SESSIONID".to_string(),
            timeout_secs: 5 * 60,
            gc_interval_secs: 5 * 60,
        }
    }
}

impl SessionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn gc_interval(&self) -> Duration {
        Duration::from_secs(self.gc_interval_secs)
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    /// Directory of static files to serve
    pub static_dir: PathBuf,
    /// Credential file
    pub htpasswd_path: PathBuf,
    pub mode: AuthMode,
    pub log_level: String,
    pub session: SessionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            static_dir: PathBuf::from("."),
            htpasswd_path: PathBuf::from(".htpasswd"),
            mode: AuthMode::default(),
            log_level: "info".to_string(),
            session: SessionSettings::default(),
        }
    }
}

impl Settings {
    /// Load from `gatehouse.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from the given TOML file (if present) and the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::figment(path.as_ref())
            .extract()
            .with_context(|| format!("invalid configuration in {}", path.as_ref().display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Layered providers: defaults, then the file, then `GATEHOUSE_*` variables
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.session.timeout_secs == 0 {
            bail!("session timeout must be greater than zero");
        }
        if self.session.gc_interval_secs == 0 {
            bail!("session gc interval must be greater than zero");
        }
        if !is_cookie_name(&self.session.cookie_name) {
            bail!("invalid session cookie name: {:?}", self.session.cookie_name);
        }
        self.bind_addr()?;
        Ok(())
    }

    /// Socket address to listen on
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let host = self.server.host.trim();
        let ip: IpAddr = if host.is_empty() {
            IpAddr::from([0, 0, 0, 0])
        } else {
            host.parse()
                .with_context(|| format!("invalid listen address: {host}"))?
        };
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

/// RFC 6265 token characters
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
}
