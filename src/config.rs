//! Dev server configuration parsed from environment variables.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::table::{DEFAULT_BACKEND_ORIGIN, DEFAULT_DEV_PORT, DEFAULT_PREFIXES, ProxyTable, RouteSpec, TableError};

pub const DEFAULT_DEV_HOST: &str = "127.0.0.1";
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROXY_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: '{value}'")]
    Parse { var: &'static str, value: String },
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevConfig {
    pub host: IpAddr,
    pub port: u16,
    pub backend_origin: String,
    pub prefixes: Vec<String>,
    pub change_origin: bool,
    pub static_dir: Option<PathBuf>,
    pub timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_DEV_PORT,
            backend_origin: DEFAULT_BACKEND_ORIGIN.to_owned(),
            prefixes: DEFAULT_PREFIXES.iter().map(|p| (*p).to_owned()).collect(),
            change_origin: true,
            static_dir: None,
            timeout: Duration::from_secs(DEFAULT_PROXY_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_PROXY_MAX_BODY_BYTES,
        }
    }
}

impl DevConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `DEV_HOST`: listen address, default `127.0.0.1`
    /// - `DEV_PORT`: listen port, default 5173
    /// - `BACKEND_ORIGIN`: default `http://localhost:8000`
    /// - `PROXY_PREFIXES`: comma-separated, default `/api,/webhook,/health`
    /// - `PROXY_CHANGE_ORIGIN`: `true` (default) or `false`
    /// - `STATIC_DIR`: built frontend served for unproxied paths
    /// - `PROXY_TIMEOUT_SECS`: default 30
    /// - `PROXY_MAX_BODY_BYTES`: default 10 MiB
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a set variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = env_parse("DEV_HOST", defaults.host)?;
        let port = env_parse("DEV_PORT", defaults.port)?;
        let backend_origin = std::env::var("BACKEND_ORIGIN")
            .map(|v| v.trim_end_matches('/').to_owned())
            .unwrap_or(defaults.backend_origin);
        let prefixes = std::env::var("PROXY_PREFIXES")
            .map(|v| parse_prefixes(&v))
            .unwrap_or(defaults.prefixes);
        let change_origin = env_parse("PROXY_CHANGE_ORIGIN", defaults.change_origin)?;
        let static_dir = std::env::var("STATIC_DIR").ok().filter(|v| !v.is_empty()).map(PathBuf::from);
        let timeout = Duration::from_secs(env_parse("PROXY_TIMEOUT_SECS", DEFAULT_PROXY_TIMEOUT_SECS)?);
        let max_body_bytes = env_parse("PROXY_MAX_BODY_BYTES", defaults.max_body_bytes)?;

        Ok(Self { host, port, backend_origin, prefixes, change_origin, static_dir, timeout, max_body_bytes })
    }

    /// Validated route table for the configured prefixes.
    ///
    /// # Errors
    ///
    /// Propagates [`TableError`] for a bad prefix or origin.
    pub fn table(&self) -> Result<ProxyTable, ConfigError> {
        let specs = self
            .prefixes
            .iter()
            .map(|prefix| RouteSpec::new(prefix.as_str(), self.backend_origin.as_str(), self.change_origin));
        Ok(ProxyTable::new(specs)?)
    }
}

fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

fn env_parse<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(var) {
        Ok(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Parse { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
