//! Configuration sources and the settings derived from them.
//!
//! Managers never touch `std::env` directly. An [`EnvSource`] is read once
//! at construction time, so tests can hand in a [`MapEnv`] instead of
//! mutating the process environment.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

pub const REDIS_SERVER_HOST: &str = "REDIS_SERVER_HOST";
pub const REDIS_PUBLIC_HOST: &str = "REDIS_PUBLIC_HOST";
pub const REDIS_SERVER_PORT: &str = "REDIS_SERVER_PORT";
pub const REDIS_SERVER_PASSWORD: &str = "REDIS_SERVER_PASSWORD";

/// Port handed out in bind responses when `REDIS_SERVER_PORT` is unset.
pub const DEFAULT_REDIS_PORT: &str = "6379";

/// Default bound on the health check's connect + PING round trip.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Read-only view of a set of environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Connection parameters for the shared Redis server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedisSettings {
    /// Host the broker itself connects to for health checks.
    pub server_host: String,

    /// Host advertised to bound applications, when it differs from `server_host`.
    pub public_host: Option<String>,

    /// Port as advertised; kept as a string since it is passed through verbatim.
    pub port: String,

    /// Optional AUTH password. An empty value is treated as unset.
    pub password: Option<String>,
}

impl RedisSettings {
    /// Read the settings out of `source`.
    ///
    /// Only `REDIS_SERVER_HOST` is required; nothing else is validated.
    pub fn from_source(source: &dyn EnvSource) -> Result<Self, AppError> {
        let server_host = source.var(REDIS_SERVER_HOST).ok_or_else(|| {
            AppError::Config(format!(
                "You must define the {} environment variable.",
                REDIS_SERVER_HOST
            ))
        })?;

        Ok(Self {
            server_host,
            public_host: source.var(REDIS_PUBLIC_HOST),
            port: source
                .var(REDIS_SERVER_PORT)
                .unwrap_or_else(|| DEFAULT_REDIS_PORT.to_string()),
            password: source.var(REDIS_SERVER_PASSWORD).filter(|p| !p.is_empty()),
        })
    }

    /// Host to hand out in bind responses.
    pub fn advertised_host(&self) -> &str {
        self.public_host.as_deref().unwrap_or(&self.server_host)
    }
}

/// Broker process configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Registry key of the manager serving requests (default: "shared")
    pub manager: String,

    /// Address the HTTP API listens on (default: 0.0.0.0:8888)
    pub bind_addr: SocketAddr,

    /// Health check timeout in milliseconds (default: 5000)
    pub redis_connect_timeout_ms: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &dyn EnvSource) -> anyhow::Result<Self> {
        Ok(Self {
            manager: source
                .var("API_MANAGER")
                .unwrap_or_else(|| "shared".to_string()),
            bind_addr: source
                .var("API_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:8888".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("API_BIND_ADDR must be a valid socket address"))?,
            redis_connect_timeout_ms: source
                .var("REDIS_CONNECT_TIMEOUT_MS")
                .unwrap_or_else(|| DEFAULT_CONNECT_TIMEOUT_MS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REDIS_CONNECT_TIMEOUT_MS must be a valid u64"))?,
        })
    }

    pub fn redis_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_connect_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_server_host_is_config_error() {
        let err = RedisSettings::from_source(&MapEnv::new()).unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("REDIS_SERVER_HOST")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let env = MapEnv::new().with(REDIS_SERVER_HOST, "db1");
        let settings = RedisSettings::from_source(&env).unwrap();
        assert_eq!(settings.server_host, "db1");
        assert_eq!(settings.public_host, None);
        assert_eq!(settings.port, "6379");
        assert_eq!(settings.password, None);
        assert_eq!(settings.advertised_host(), "db1");
    }

    #[test]
    fn test_public_host_overrides_advertised_host() {
        let env: MapEnv = [(REDIS_SERVER_HOST, "db1"), (REDIS_PUBLIC_HOST, "pub1")]
            .into_iter()
            .collect();
        let settings = RedisSettings::from_source(&env).unwrap();
        assert_eq!(settings.advertised_host(), "pub1");
        assert_eq!(settings.server_host, "db1");
    }

    #[test]
    fn test_empty_password_is_unset() {
        let env = MapEnv::new()
            .with(REDIS_SERVER_HOST, "db1")
            .with(REDIS_SERVER_PASSWORD, "");
        let settings = RedisSettings::from_source(&env).unwrap();
        assert_eq!(settings.password, None);
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_source(&MapEnv::new()).unwrap();
        assert_eq!(config.manager, "shared");
        assert_eq!(config.bind_addr, "0.0.0.0:8888".parse::<SocketAddr>().unwrap());
        assert_eq!(config.redis_connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_app_config_rejects_bad_timeout() {
        let env = MapEnv::new().with("REDIS_CONNECT_TIMEOUT_MS", "soon");
        assert!(AppConfig::from_source(&env).is_err());
    }
}
