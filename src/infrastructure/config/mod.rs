use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::error::{AppError, Result};

/// Published Google Sheets export backing the schedule.
pub const DEFAULT_UPSTREAM_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vREzj2I3fkZwX0Ah9eifzl8QjKqitgZFOxyTKFztAKv7ldOeRtRoDbsCRNfeMBjLknAAAwlSZ-ceLsm/pub?gid=0&single=true&output=csv";

pub const DEFAULT_CONFIG_FILE: &str = "slurps-schedule.toml";
pub const CONFIG_PATH_VAR: &str = "SLURPS_CONFIG";
pub const ENV_PREFIX: &str = "SLURPS_";

/// Edge cache lifetime advertised in `s-maxage`; the in-memory cache may not
/// outlive it.
pub const EDGE_MAX_AGE_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port
    pub port: u16,
    pub endpoint_path: String,
    pub upstream_url: String,
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    /// In-memory cache lifetime; 0 disables the cache
    pub cache_ttl_secs: u64,
    pub cors_permissive: bool,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            endpoint_path: "/api/slurps-schedule".to_string(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            user_agent: "Mozilla/5.0 (compatible; slurps-schedule/0.1)".to_string(),
            fetch_timeout_secs: 10,
            cache_ttl_secs: 0,
            cors_permissive: true,
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults, then the TOML file (if present), then `SLURPS_*` variables.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::from_figment(Self::figment(path))
    }

    pub fn figment(path: PathBuf) -> Figment {
        Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: ServerConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.upstream_url).map_err(|e| {
            AppError::ConfigError(format!("upstream_url is not a valid URL: {}", e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::ConfigError(format!(
                "upstream_url must use http or https, got {}",
                url.scheme()
            )));
        }
        if !self.endpoint_path.starts_with('/') {
            return Err(AppError::ConfigError(
                "endpoint_path must start with '/'".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "fetch_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.cache_ttl_secs > EDGE_MAX_AGE_SECS {
            return Err(AppError::ConfigError(format!(
                "cache_ttl_secs must be <= {}",
                EDGE_MAX_AGE_SECS
            )));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// `None` when the in-memory cache is disabled
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}
