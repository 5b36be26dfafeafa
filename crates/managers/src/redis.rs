//! Shared Redis manager.
//!
//! Every application binds to the same pre-existing Redis server, so adding,
//! unbinding and removing instances are no-ops. Binding hands out the
//! configured host, port and password.

use std::time::Duration;

use async_trait::async_trait;

use redisapi_common::config::{DEFAULT_CONNECT_TIMEOUT_MS, EnvSource, RedisSettings};
use redisapi_common::error::AppError;
use redisapi_common::redis_client;
use redisapi_common::types::{BIND_HOST, BIND_PASSWORD, BIND_PORT, BindResult, HealthResult};

use crate::Manager;

pub struct RedisManager {
    settings: RedisSettings,
    connect_timeout: Duration,
}

impl RedisManager {
    pub fn new(settings: RedisSettings) -> Self {
        Self {
            settings,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }

    /// Build a manager from environment variables.
    ///
    /// Fails with [`AppError::Config`] when `REDIS_SERVER_HOST` is not defined.
    pub fn from_env(source: &dyn EnvSource) -> Result<Self, AppError> {
        Ok(Self::new(RedisSettings::from_source(source)?))
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn settings(&self) -> &RedisSettings {
        &self.settings
    }

    /// Bind response built from the settings alone; no network access.
    pub fn bind_result(&self) -> BindResult {
        let mut result = BindResult::new();
        result.insert(
            BIND_HOST.to_string(),
            self.settings.advertised_host().to_string(),
        );
        result.insert(BIND_PORT.to_string(), self.settings.port.clone());
        if let Some(password) = &self.settings.password {
            result.insert(BIND_PASSWORD.to_string(), password.clone());
        }
        result
    }
}

#[async_trait]
impl Manager for RedisManager {
    fn name(&self) -> &'static str {
        "shared"
    }

    async fn add_instance(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn bind(&self) -> Result<BindResult, AppError> {
        Ok(self.bind_result())
    }

    async fn unbind(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn remove_instance(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn is_ok(&self) -> HealthResult {
        match redis_client::ping(&self.settings, self.connect_timeout).await {
            Ok(()) => HealthResult::healthy(),
            Err(e) => {
                tracing::warn!(
                    host = %self.settings.server_host,
                    error = %e,
                    "Redis health check failed"
                );
                HealthResult::unhealthy(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redisapi_common::config::{
        MapEnv, REDIS_PUBLIC_HOST, REDIS_SERVER_HOST, REDIS_SERVER_PASSWORD, REDIS_SERVER_PORT,
    };

    #[test]
    fn test_from_env_requires_server_host() {
        let err = RedisManager::from_env(&MapEnv::new()).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("REDIS_SERVER_HOST"));
    }

    #[tokio::test]
    async fn test_bind_with_defaults() {
        let env = MapEnv::new().with(REDIS_SERVER_HOST, "db1");
        let manager = RedisManager::from_env(&env).unwrap();

        let result = manager.bind().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["REDIS_HOST"], "db1");
        assert_eq!(result["REDIS_PORT"], "6379");
        assert!(!result.contains_key("REDIS_PASSWORD"));
    }

    #[tokio::test]
    async fn test_bind_with_every_variable() {
        let env = MapEnv::new()
            .with(REDIS_SERVER_HOST, "db1")
            .with(REDIS_PUBLIC_HOST, "pub1")
            .with(REDIS_SERVER_PORT, "1234")
            .with(REDIS_SERVER_PASSWORD, "secret");
        let manager = RedisManager::from_env(&env).unwrap();

        let result = manager.bind().await.unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result["REDIS_HOST"], "pub1");
        assert_eq!(result["REDIS_PORT"], "1234");
        assert_eq!(result["REDIS_PASSWORD"], "secret");
    }

    #[tokio::test]
    async fn test_lifecycle_operations_are_noops() {
        let env = MapEnv::new().with(REDIS_SERVER_HOST, "db1");
        let manager = RedisManager::from_env(&env).unwrap();
        let before = manager.settings().clone();

        manager.add_instance().await.unwrap();
        manager.unbind().await.unwrap();
        manager.remove_instance().await.unwrap();

        assert_eq!(manager.settings(), &before);
    }

    #[tokio::test]
    async fn test_is_ok_reports_unreachable_host() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let env = MapEnv::new()
            .with(REDIS_SERVER_HOST, "127.0.0.1")
            .with(REDIS_SERVER_PORT, &port.to_string());
        let manager = RedisManager::from_env(&env)
            .unwrap()
            .with_connect_timeout(Duration::from_secs(2));

        let health = manager.is_ok().await;

        assert!(!health.ok);
        assert!(!health.message.is_empty());
    }

    #[tokio::test]
    async fn test_is_ok_reports_invalid_port() {
        let env = MapEnv::new()
            .with(REDIS_SERVER_HOST, "127.0.0.1")
            .with(REDIS_SERVER_PORT, "not-a-port");
        let manager = RedisManager::from_env(&env).unwrap();

        let health = manager.is_ok().await;

        assert!(!health.ok);
        assert!(health.message.contains("REDIS_SERVER_PORT"));
    }
}
