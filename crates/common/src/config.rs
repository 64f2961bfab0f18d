//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// HR identity API configuration.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Report cache configuration.
    #[serde(default)]
    pub reports: ReportConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// HR identity API configuration.
///
/// Login submissions are forwarded here first; on failure the local
/// credential check is the fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Whether the external identity API is consulted at all.
    #[serde(default)]
    pub enabled: bool,
    /// Login endpoint URL of the HR identity API.
    #[serde(default)]
    pub login_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_identity_timeout")]
    pub timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            login_url: None,
            timeout_secs: default_identity_timeout(),
        }
    }
}

/// Report cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// TTL for cached aggregate reads, in seconds.
    #[serde(default = "default_report_ttl")]
    pub cache_ttl_secs: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_report_ttl(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_identity_timeout() -> u64 {
    10
}

const fn default_report_ttl() -> i64 {
    300
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `OPSBOARD_ENV`)
    /// 3. Environment variables with `OPSBOARD_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("OPSBOARD_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("OPSBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("OPSBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_config_default() {
        let identity = IdentityConfig::default();
        assert!(!identity.enabled);
        assert!(identity.login_url.is_none());
        assert_eq!(identity.timeout_secs, 10);
    }

    #[test]
    fn test_report_config_default() {
        let reports = ReportConfig::default();
        assert_eq!(reports.cache_ttl_secs, 300);
    }
}
